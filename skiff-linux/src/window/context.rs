use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gio;
use libadwaita as adw;

use skiff_core::session::BrowserSession;

/// Shared window state passed between window module functions.
///
/// All fields are cheaply cloneable (GObject refs or Rc-wrapped) and shared
/// across signal closures within the GTK main loop.
#[derive(Clone)]
pub(crate) struct ShellContext {
    pub window: adw::ApplicationWindow,
    pub tab_view: adw::TabView,
    pub address: gtk4::Entry,
    pub bookmarks_menu: gio::Menu,
    pub history_menu: gio::Menu,
    pub network_session: webkit6::NetworkSession,
    pub session: Rc<RefCell<BrowserSession>>,
}
