mod context;
mod dialogs;
mod tab_management;

use gtk4::gio;
use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;
use webkit6::prelude::*;

use std::cell::RefCell;
use std::rc::Rc;

use skiff_core::commands::{self, BUILTIN_COMMANDS};
use skiff_core::paths::ProfilePaths;
use skiff_core::session::{BrowserSession, Command, Effect};

pub(crate) use context::ShellContext;

pub fn build_window(app: &adw::Application, paths: &ProfilePaths) {
    let session = Rc::new(RefCell::new(BrowserSession::open(paths)));
    let network_session = crate::webview::create_network_session(paths);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Skiff")
        .default_width(1200)
        .default_height(800)
        .build();

    // Main vertical layout
    let main_box = gtk4::Box::new(gtk4::Orientation::Vertical, 0);

    // Header bar: navigation on the left, address in the middle, menus on the right
    let header = adw::HeaderBar::new();

    let address = gtk4::Entry::new();
    address.set_placeholder_text(Some("Enter URL and press Enter..."));
    address.set_hexpand(true);
    address.set_input_purpose(gtk4::InputPurpose::Url);
    header.set_title_widget(Some(&address));

    let bookmarks_menu = gio::Menu::new();
    let history_menu = gio::Menu::new();

    let tab_bar = adw::TabBar::new();
    let tab_view = adw::TabView::new();
    tab_view.set_vexpand(true);
    tab_bar.set_view(Some(&tab_view));
    tab_bar.set_autohide(false);

    let ctx = ShellContext {
        window: window.clone(),
        tab_view: tab_view.clone(),
        address: address.clone(),
        bookmarks_menu: bookmarks_menu.clone(),
        history_menu: history_menu.clone(),
        network_session,
        session,
    };

    for (id, icon) in [
        ("back", "go-previous-symbolic"),
        ("forward", "go-next-symbolic"),
        ("reload", "view-refresh-symbolic"),
        ("home", "go-home-symbolic"),
    ] {
        header.pack_start(&command_button(&ctx, id, icon));
    }

    // pack_end stacks right-to-left
    header.pack_end(&command_button(&ctx, "new_tab", "tab-new-symbolic"));
    let history_btn = gtk4::MenuButton::builder()
        .icon_name("document-open-recent-symbolic")
        .tooltip_text("History")
        .menu_model(&history_menu)
        .build();
    header.pack_end(&history_btn);
    let bookmarks_btn = gtk4::MenuButton::builder()
        .icon_name("user-bookmarks-symbolic")
        .tooltip_text("Bookmarks")
        .menu_model(&bookmarks_menu)
        .build();
    header.pack_end(&bookmarks_btn);
    header.pack_end(&command_button(&ctx, "add_bookmark", "bookmark-new-symbolic"));

    main_box.append(&header);
    main_box.append(&tab_bar);
    main_box.append(&tab_view);
    window.set_content(Some(&main_box));

    // Address bar submit
    {
        let ctx = ctx.clone();
        address.connect_activate(move |entry| {
            run_guarded_ui("address-activate", || {
                let text = entry.text().to_string();
                dispatch(&ctx, Command::Navigate(text));
            });
        });
    }

    setup_menu_actions(&ctx);
    setup_shortcuts(&ctx);
    tab_management::setup_tab_switch_handler(&ctx);
    tab_management::setup_tab_close_handler(&ctx);
    tab_management::setup_tab_reorder_handler(&ctx);

    // Flush config and history on close
    {
        let session = ctx.session.clone();
        window.connect_close_request(move |_window| {
            session.borrow_mut().dispatch(Command::Shutdown);
            gtk4::glib::Propagation::Proceed
        });
    }

    let effects = ctx.session.borrow_mut().start();
    apply_effects(&ctx, effects);

    window.present();
}

/// Send a command to the session and apply whatever it asks for.
///
/// The session borrow ends before any widget is touched, so signals fired
/// while applying effects may dispatch again.
pub(crate) fn dispatch(ctx: &ShellContext, command: Command) {
    let effects = ctx.session.borrow_mut().dispatch(command);
    apply_effects(ctx, effects);
}

pub(crate) fn apply_effects(ctx: &ShellContext, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::LoadUrl { tab, url } => {
                if let Some(webview) = tab_management::webview_for(&ctx.tab_view, tab) {
                    webview.load_uri(&url);
                }
            }
            Effect::GoBack { tab } => {
                if let Some(webview) = tab_management::webview_for(&ctx.tab_view, tab) {
                    webview.go_back();
                }
            }
            Effect::GoForward { tab } => {
                if let Some(webview) = tab_management::webview_for(&ctx.tab_view, tab) {
                    webview.go_forward();
                }
            }
            Effect::Reload { tab } => {
                if let Some(webview) = tab_management::webview_for(&ctx.tab_view, tab) {
                    webview.reload();
                }
            }
            Effect::OpenTab { tab, url, title } => {
                tab_management::open_tab(ctx, tab, &url, &title);
            }
            // Pages are removed by the close-page handler, which is the only
            // place a CloseTab command originates.
            Effect::CloseTab { .. } => {}
            Effect::SelectTab { tab } => {
                if let Some(page) = tab_management::page_for(&ctx.tab_view, tab) {
                    ctx.tab_view.set_selected_page(&page);
                }
            }
            Effect::SetTabTitle { tab, title } => {
                if let Some(page) = tab_management::page_for(&ctx.tab_view, tab) {
                    page.set_title(&title);
                }
            }
            Effect::SetAddress(text) => {
                if ctx.address.text().as_str() != text {
                    ctx.address.set_text(&text);
                }
            }
            Effect::RefreshBookmarks => refresh_bookmarks_menu(ctx),
            Effect::RefreshHistory => refresh_history_menu(ctx),
        }
    }
}

/// Run the built-in command registered under `id`.
fn run_command(ctx: &ShellContext, id: &str) {
    match id {
        "back" => dispatch(ctx, Command::Back),
        "forward" => dispatch(ctx, Command::Forward),
        "reload" => dispatch(ctx, Command::Reload),
        "home" => dispatch(ctx, Command::Home),
        "new_tab" => dispatch(ctx, Command::NewTab),
        "close_tab" => {
            if let Some(page) = ctx.tab_view.selected_page() {
                ctx.tab_view.close_page(&page);
            }
        }
        "add_bookmark" => {
            let text = ctx.address.text().to_string();
            dispatch(ctx, Command::AddBookmark(text));
        }
        "edit_bookmarks" => dialogs::show_edit_bookmarks(ctx),
        "view_history" => dialogs::show_detailed_history(ctx),
        "focus_address" => {
            ctx.address.grab_focus();
            ctx.address.select_region(0, -1);
        }
        other => log::warn!("Unknown command id '{}'", other),
    }
}

fn command_button(ctx: &ShellContext, id: &'static str, icon: &str) -> gtk4::Button {
    let button = gtk4::Button::from_icon_name(icon);
    button.set_tooltip_text(Some(&commands::tooltip(id)));
    button.set_cursor_from_name(Some("pointer"));
    let ctx = ctx.clone();
    button.connect_clicked(move |_| {
        run_guarded_ui(id, || run_command(&ctx, id));
    });
    button
}

/// Window actions used by the Bookmarks and History menus.
fn setup_menu_actions(ctx: &ShellContext) {
    let open_url = gio::SimpleAction::new("open-url", Some(gtk4::glib::VariantTy::STRING));
    {
        let ctx = ctx.clone();
        open_url.connect_activate(move |_, param| {
            run_guarded_ui("open-url", || {
                if let Some(url) = param.and_then(|v| v.get::<String>()) {
                    dispatch(&ctx, Command::OpenUrl(url));
                }
            });
        });
    }
    ctx.window.add_action(&open_url);

    for (name, id) in [
        ("edit-bookmarks", "edit_bookmarks"),
        ("view-history", "view_history"),
    ] {
        let action = gio::SimpleAction::new(name, None);
        let ctx = ctx.clone();
        action.connect_activate(move |_, _| {
            run_guarded_ui(id, || run_command(&ctx, id));
        });
        ctx.window.add_action(&action);
    }
}

/// Install every built-in command's default accelerator. Capture phase so
/// shortcuts still work while a WebView has focus.
fn setup_shortcuts(ctx: &ShellContext) {
    let controller = gtk4::ShortcutController::new();
    controller.set_propagation_phase(gtk4::PropagationPhase::Capture);
    for cmd in BUILTIN_COMMANDS {
        let ctx = ctx.clone();
        let id = cmd.id;
        add_shortcut(&controller, cmd.default_accel, move || {
            run_guarded_ui(id, || run_command(&ctx, id));
        });
    }
    ctx.window.add_controller(controller);
}

fn add_shortcut(controller: &gtk4::ShortcutController, accel: &str, callback: impl Fn() + 'static) {
    let trigger = gtk4::ShortcutTrigger::parse_string(accel);
    let action = gtk4::CallbackAction::new(move |_widget, _args| {
        callback();
        gtk4::glib::Propagation::Stop
    });
    match trigger {
        Some(trigger) => {
            let shortcut = gtk4::Shortcut::new(Some(trigger), Some(action));
            controller.add_shortcut(shortcut);
        }
        None => log::warn!("Ignoring unparseable accelerator '{}'", accel),
    }
}

/// Menu labels treat `_` as a mnemonic marker; double it so URLs show verbatim.
fn menu_label(text: &str) -> String {
    text.replace('_', "__")
}

fn url_item(label: &str, url: &str) -> gio::MenuItem {
    let item = gio::MenuItem::new(Some(&menu_label(label)), None);
    item.set_action_and_target_value(Some("win.open-url"), Some(&url.to_variant()));
    item
}

fn refresh_bookmarks_menu(ctx: &ShellContext) {
    let bookmarks = ctx.session.borrow().bookmarks().to_vec();
    ctx.bookmarks_menu.remove_all();

    let list = gio::Menu::new();
    for url in &bookmarks {
        list.append_item(&url_item(url, url));
    }
    ctx.bookmarks_menu.append_section(None, &list);

    let edit = gio::Menu::new();
    edit.append(Some("Edit Bookmarks..."), Some("win.edit-bookmarks"));
    ctx.bookmarks_menu.append_section(None, &edit);
}

fn refresh_history_menu(ctx: &ShellContext) {
    let recent = ctx.session.borrow().recent_history();
    ctx.history_menu.remove_all();
    if recent.is_empty() {
        return;
    }

    let list = gio::Menu::new();
    for entry in &recent {
        list.append_item(&url_item(&entry.url, &entry.url));
    }
    ctx.history_menu.append_section(None, &list);

    let detailed = gio::Menu::new();
    detailed.append(Some("View Detailed History..."), Some("win.view-history"));
    ctx.history_menu.append_section(None, &detailed);
}

fn run_guarded_ui<F: FnOnce()>(label: &str, f: F) {
    if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "non-string panic payload"
        };
        log::error!("UI callback panic in '{}': {}", label, msg);
    }
}
