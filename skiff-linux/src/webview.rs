use gtk4::prelude::*;
use webkit6::prelude::*;

use skiff_core::paths::ProfilePaths;
use skiff_core::session::TabId;

/// Notifications a page's WebView raises for the window to forward.
#[derive(Debug, Clone)]
pub enum PageEvent {
    UriChanged(String),
    TitleChanged(String),
    LoadingChanged(bool),
}

/// Build the engine session that keeps cookies, local storage and cache in
/// the profile directory.
pub fn create_network_session(paths: &ProfilePaths) -> webkit6::NetworkSession {
    if let Err(e) = paths.ensure_dirs() {
        log::error!("Failed to create engine directories: {}", e);
    }
    let data_dir = paths.engine_data_dir.to_string_lossy().to_string();
    let cache_dir = paths.engine_cache_dir.to_string_lossy().to_string();
    log::debug!("Engine data in {}, cache in {}", data_dir, cache_dir);
    let network_session = webkit6::NetworkSession::new(Some(&data_dir), Some(&cache_dir));

    // Cookies are kept in memory unless a persistent store is set.
    let cookie_file = paths.cookie_file.to_string_lossy().to_string();
    let cookies = network_session.cookie_manager();
    cookies.set_persistent_storage(&cookie_file, webkit6::CookiePersistentStorage::Sqlite);
    log::debug!("Cookies persisted to {}", cookie_file);

    network_session
}

/// Create the WebView for a tab.
///
/// The widget name carries the tab id so any page can be mapped back to its
/// session tab with [`tab_id_of`]. `on_event` is invoked for every
/// [`PageEvent`] the view raises.
pub fn create_page_view<F>(
    network_session: &webkit6::NetworkSession,
    tab: TabId,
    on_event: F,
) -> webkit6::WebView
where
    F: Fn(&webkit6::WebView, PageEvent) + 'static,
{
    let webview = webkit6::WebView::builder()
        .network_session(network_session)
        .hexpand(true)
        .vexpand(true)
        .build();
    webview.set_widget_name(&tab.to_string());

    if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        wk_settings.set_enable_javascript(true);
        wk_settings.set_enable_developer_extras(true);
    }

    let on_event = std::rc::Rc::new(on_event);
    {
        let on_event = on_event.clone();
        webview.connect_uri_notify(move |wv| {
            if let Some(uri) = wv.uri() {
                on_event(wv, PageEvent::UriChanged(uri.to_string()));
            }
        });
    }
    {
        let on_event = on_event.clone();
        webview.connect_title_notify(move |wv| {
            let title = wv.title().map(|t| t.to_string()).unwrap_or_default();
            on_event(wv, PageEvent::TitleChanged(title));
        });
    }
    webview.connect_is_loading_notify(move |wv| {
        on_event(wv, PageEvent::LoadingChanged(wv.is_loading()));
    });

    webview
}

/// Recover the tab id stored in a page widget's name.
pub fn tab_id_of(widget: &impl IsA<gtk4::Widget>) -> Option<TabId> {
    widget.widget_name().parse().ok()
}
