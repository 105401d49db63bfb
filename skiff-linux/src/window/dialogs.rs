use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;

use std::cell::RefCell;
use std::rc::Rc;

use skiff_core::history_view::{history_rows, HistoryRow};
use skiff_core::session::Command;

use super::{dispatch, run_guarded_ui, ShellContext};

fn dialog_window(parent: &impl IsA<gtk4::Window>, title: &str, width: i32, height: i32) -> gtk4::Window {
    gtk4::Window::builder()
        .transient_for(parent)
        .modal(true)
        .title(title)
        .default_width(width)
        .default_height(height)
        .build()
}

/// Close `dialog` when Escape is pressed inside `widget`.
fn close_on_escape(dialog: &gtk4::Window, widget: &impl IsA<gtk4::Widget>) {
    let key_controller = gtk4::EventControllerKey::new();
    let dialog = dialog.clone();
    key_controller.connect_key_pressed(move |_, key, _, _| {
        if key == gtk4::gdk::Key::Escape {
            dialog.close();
            return gtk4::glib::Propagation::Stop;
        }
        gtk4::glib::Propagation::Proceed
    });
    widget.add_controller(key_controller);
}

fn selected_index(list: &gtk4::ListBox) -> Option<usize> {
    list.selected_row()
        .map(|row| row.index())
        .filter(|i| *i >= 0)
        .map(|i| i as usize)
}

fn render_bookmarks(list: &gtk4::ListBox, items: &[String], selected: Option<usize>) {
    while let Some(row) = list.row_at_index(0) {
        list.remove(&row);
    }
    for url in items {
        let label = gtk4::Label::new(Some(url));
        label.set_halign(gtk4::Align::Start);
        label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        label.set_margin_start(8);
        label.set_margin_top(4);
        label.set_margin_bottom(4);
        list.append(&label);
    }
    if let Some(index) = selected {
        if let Some(row) = list.row_at_index(index as i32) {
            list.select_row(Some(&row));
        }
    }
}

/// Ask for a URL. `on_submit` receives the raw text when Enter or OK is used.
fn prompt_url(
    parent: &gtk4::Window,
    title: &str,
    initial: &str,
    on_submit: impl Fn(String) + 'static,
) {
    let dialog = dialog_window(parent, title, 420, 60);

    let hbox = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    hbox.set_margin_start(12);
    hbox.set_margin_end(12);
    hbox.set_margin_top(12);
    hbox.set_margin_bottom(12);

    let label = gtk4::Label::new(Some("Enter new URL:"));
    let entry = gtk4::Entry::new();
    entry.set_hexpand(true);
    entry.set_input_purpose(gtk4::InputPurpose::Url);
    entry.set_text(initial);
    let ok_button = gtk4::Button::with_label("OK");
    ok_button.add_css_class("suggested-action");

    hbox.append(&label);
    hbox.append(&entry);
    hbox.append(&ok_button);
    dialog.set_child(Some(&hbox));

    let submit: Rc<dyn Fn()> = {
        let dialog = dialog.clone();
        let entry = entry.clone();
        Rc::new(move || {
            let text = entry.text().to_string();
            dialog.close();
            on_submit(text);
        })
    };
    {
        let submit = submit.clone();
        entry.connect_activate(move |_| submit());
    }
    ok_button.connect_clicked(move |_| submit());
    close_on_escape(&dialog, &entry);

    dialog.present();
    entry.grab_focus();
}

/// Edit the bookmark list on a working copy; only "Save" commits it.
pub(super) fn show_edit_bookmarks(ctx: &ShellContext) {
    let editor = Rc::new(RefCell::new(ctx.session.borrow().bookmark_editor()));
    let dialog = dialog_window(&ctx.window, "Edit Bookmarks", 560, 420);

    let vbox = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    vbox.set_margin_start(12);
    vbox.set_margin_end(12);
    vbox.set_margin_top(12);
    vbox.set_margin_bottom(12);

    let scroll = gtk4::ScrolledWindow::new();
    scroll.set_vexpand(true);
    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::Single);
    scroll.set_child(Some(&list));
    vbox.append(&scroll);
    render_bookmarks(&list, editor.borrow().items(), None);

    let buttons = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    let add_btn = gtk4::Button::with_label("Add");
    let edit_btn = gtk4::Button::with_label("Edit");
    let delete_btn = gtk4::Button::with_label("Delete");
    let up_btn = gtk4::Button::with_label("Move Up");
    let down_btn = gtk4::Button::with_label("Move Down");
    let save_btn = gtk4::Button::with_label("Save");
    save_btn.add_css_class("suggested-action");
    save_btn.set_hexpand(true);
    save_btn.set_halign(gtk4::Align::End);
    for button in [&add_btn, &edit_btn, &delete_btn, &up_btn, &down_btn, &save_btn] {
        buttons.append(button);
    }
    vbox.append(&buttons);
    dialog.set_child(Some(&vbox));

    // Add
    {
        let dialog_ref = dialog.clone();
        let editor = editor.clone();
        let list = list.clone();
        add_btn.connect_clicked(move |_| {
            let editor = editor.clone();
            let list = list.clone();
            prompt_url(&dialog_ref, "Add Bookmark", "", move |text| {
                run_guarded_ui("bookmark-add", || {
                    let added = editor.borrow_mut().add(&text);
                    if let Some(index) = added {
                        render_bookmarks(&list, editor.borrow().items(), Some(index));
                    }
                });
            });
        });
    }

    // Edit
    {
        let dialog_ref = dialog.clone();
        let editor = editor.clone();
        let list = list.clone();
        edit_btn.connect_clicked(move |_| {
            let Some(index) = selected_index(&list) else {
                return;
            };
            let current = match editor.borrow().items().get(index) {
                Some(url) => url.clone(),
                None => return,
            };
            let editor = editor.clone();
            let list = list.clone();
            prompt_url(&dialog_ref, "Edit Bookmark", &current, move |text| {
                run_guarded_ui("bookmark-edit", || {
                    let result = editor.borrow_mut().edit(index, &text);
                    match result {
                        Ok(()) => render_bookmarks(&list, editor.borrow().items(), Some(index)),
                        Err(e) => log::warn!("Bookmark edit rejected: {}", e),
                    }
                });
            });
        });
    }

    // Delete, after confirmation
    {
        let dialog_ref = dialog.clone();
        let editor = editor.clone();
        let list = list.clone();
        delete_btn.connect_clicked(move |_| {
            let Some(index) = selected_index(&list) else {
                return;
            };
            let confirm = adw::AlertDialog::builder()
                .heading("Delete Bookmark")
                .body("Are you sure you want to delete this bookmark?")
                .build();
            confirm.add_response("no", "No");
            confirm.add_response("yes", "Yes");
            confirm.set_response_appearance("yes", adw::ResponseAppearance::Destructive);
            confirm.set_default_response(Some("no"));
            confirm.set_close_response("no");

            let editor = editor.clone();
            let list = list.clone();
            confirm.connect_response(None, move |_dialog, response| {
                if response != "yes" {
                    return;
                }
                let result = editor.borrow_mut().delete(index);
                match result {
                    Ok(url) => {
                        log::debug!("Removed bookmark {}", url);
                        let len = editor.borrow().len();
                        let next = if len == 0 { None } else { Some(index.min(len - 1)) };
                        render_bookmarks(&list, editor.borrow().items(), next);
                    }
                    Err(e) => log::warn!("Bookmark delete rejected: {}", e),
                }
            });
            confirm.present(Some(&dialog_ref));
        });
    }

    // Move up / down
    for (button, up) in [(&up_btn, true), (&down_btn, false)] {
        let editor = editor.clone();
        let list = list.clone();
        button.connect_clicked(move |_| {
            let Some(index) = selected_index(&list) else {
                return;
            };
            let result = if up {
                editor.borrow_mut().move_up(index)
            } else {
                editor.borrow_mut().move_down(index)
            };
            match result {
                Ok(new_index) => {
                    render_bookmarks(&list, editor.borrow().items(), Some(new_index));
                }
                Err(e) => log::warn!("Bookmark move rejected: {}", e),
            }
        });
    }

    // Save commits the working copy; closing the window any other way discards it.
    {
        let ctx = ctx.clone();
        let dialog_ref = dialog.clone();
        save_btn.connect_clicked(move |_| {
            let committed = editor.borrow().clone().commit();
            dialog_ref.close();
            run_guarded_ui("bookmark-commit", || {
                dispatch(&ctx, Command::CommitBookmarks(committed));
            });
        });
    }

    close_on_escape(&dialog, &list);
    dialog.present();
}

/// Show every history entry grouped by ISO week. Choosing an entry opens it
/// in a new tab.
pub(super) fn show_detailed_history(ctx: &ShellContext) {
    let rows = Rc::new(history_rows(&ctx.session.borrow().history_groups()));
    let dialog = dialog_window(&ctx.window, "Detailed History", 640, 480);

    let vbox = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    vbox.set_margin_start(12);
    vbox.set_margin_end(12);
    vbox.set_margin_top(12);
    vbox.set_margin_bottom(12);

    let scroll = gtk4::ScrolledWindow::new();
    scroll.set_vexpand(true);
    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::Single);
    scroll.set_child(Some(&list));
    vbox.append(&scroll);

    for row in rows.iter() {
        let label = gtk4::Label::new(Some(&row.label()));
        label.set_halign(gtk4::Align::Start);
        label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        label.set_margin_top(2);
        label.set_margin_bottom(2);
        let list_row = gtk4::ListBoxRow::new();
        list_row.set_child(Some(&label));
        if let HistoryRow::Week(_) = row {
            label.add_css_class("heading");
            list_row.set_selectable(false);
            list_row.set_activatable(false);
        }
        list.append(&list_row);
    }

    let buttons = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    buttons.set_halign(gtk4::Align::End);
    let select_btn = gtk4::Button::with_label("Select");
    select_btn.add_css_class("suggested-action");
    buttons.append(&select_btn);
    vbox.append(&buttons);
    dialog.set_child(Some(&vbox));

    let choose: Rc<dyn Fn(Option<usize>)> = {
        let ctx = ctx.clone();
        let dialog = dialog.clone();
        let rows = rows.clone();
        Rc::new(move |index: Option<usize>| {
            let url = index
                .and_then(|i| rows.get(i))
                .and_then(|row| row.url().map(str::to_string));
            dialog.close();
            if let Some(url) = url {
                run_guarded_ui("history-select", || dispatch(&ctx, Command::OpenUrl(url)));
            }
        })
    };
    {
        let choose = choose.clone();
        let list_ref = list.clone();
        select_btn.connect_clicked(move |_| choose(selected_index(&list_ref)));
    }
    list.connect_row_activated(move |_list, row| {
        let index = row.index();
        choose((index >= 0).then_some(index as usize));
    });

    close_on_escape(&dialog, &list);
    dialog.present();
}
