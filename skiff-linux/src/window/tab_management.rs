use gtk4::prelude::*;
use libadwaita as adw;
use webkit6::prelude::*;

use skiff_core::session::{Command, Effect, TabId};

use crate::webview::{self, PageEvent};

use super::{apply_effects, dispatch, run_guarded_ui, ShellContext};

/// Find the page whose child carries `tab`'s id.
pub(super) fn page_for(tab_view: &adw::TabView, tab: TabId) -> Option<adw::TabPage> {
    let n = tab_view.n_pages();
    (0..n)
        .map(|i| tab_view.nth_page(i))
        .find(|page| webview::tab_id_of(&page.child()) == Some(tab))
}

pub(super) fn webview_for(tab_view: &adw::TabView, tab: TabId) -> Option<webkit6::WebView> {
    page_for(tab_view, tab).and_then(|page| page.child().downcast::<webkit6::WebView>().ok())
}

/// Append a page for `tab`, select it and start loading `url`.
pub(super) fn open_tab(ctx: &ShellContext, tab: TabId, url: &str, title: &str) {
    let event_ctx = ctx.clone();
    let view = webview::create_page_view(&ctx.network_session, tab, move |wv, event| {
        run_guarded_ui("page-event", || {
            let Some(tab) = webview::tab_id_of(wv) else {
                return;
            };
            match event {
                PageEvent::UriChanged(url) => {
                    dispatch(&event_ctx, Command::UrlChanged { tab, url });
                }
                PageEvent::TitleChanged(title) => {
                    dispatch(&event_ctx, Command::TitleChanged { tab, title });
                }
                PageEvent::LoadingChanged(loading) => {
                    if let Some(page) = page_for(&event_ctx.tab_view, tab) {
                        page.set_loading(loading);
                    }
                }
            }
        });
    });

    let page = ctx.tab_view.append(&view);
    page.set_title(title);
    ctx.tab_view.set_selected_page(&page);
    view.load_uri(url);
}

/// Keep the session's current tab and the address bar in step with the
/// selected page.
pub(super) fn setup_tab_switch_handler(ctx: &ShellContext) {
    let handler_ctx = ctx.clone();
    ctx.tab_view.connect_selected_page_notify(move |tv| {
        run_guarded_ui("tab-selected-page-notify", || {
            if let Some(page) = tv.selected_page() {
                if let Some(tab) = webview::tab_id_of(&page.child()) {
                    dispatch(&handler_ctx, Command::SelectTab(tab));
                }
            }
        });
    });
}

/// Route every close request through the session, which refuses to close the
/// last remaining tab.
pub(super) fn setup_tab_close_handler(ctx: &ShellContext) {
    let handler_ctx = ctx.clone();
    ctx.tab_view.connect_close_page(move |tv, page| {
        let Some(tab) = webview::tab_id_of(&page.child()) else {
            tv.close_page_finish(page, true);
            return gtk4::glib::Propagation::Stop;
        };

        let effects = handler_ctx
            .session
            .borrow_mut()
            .dispatch(Command::CloseTab(tab));
        let confirmed = effects
            .iter()
            .any(|e| matches!(e, Effect::CloseTab { tab: closed } if *closed == tab));
        tv.close_page_finish(page, confirmed);
        if confirmed {
            log::debug!("Closed {}", tab);
        }
        apply_effects(&handler_ctx, effects);
        gtk4::glib::Propagation::Stop
    });
}

/// Mirror drag-and-drop reordering into the session's tab order.
pub(super) fn setup_tab_reorder_handler(ctx: &ShellContext) {
    let handler_ctx = ctx.clone();
    ctx.tab_view.connect_page_reordered(move |_tv, page, position| {
        run_guarded_ui("tab-page-reordered", || {
            if let Some(tab) = webview::tab_id_of(&page.child()) {
                dispatch(
                    &handler_ctx,
                    Command::MoveTab {
                        tab,
                        position: position.max(0) as usize,
                    },
                );
            }
        });
    });
}
