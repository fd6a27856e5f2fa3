use super::*;
use crate::palette::{filter_entries, palette_entries, PaletteGroup};

#[component]
pub(super) fn CommandPalette() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let manager = runtime.manager;
    let entries = store_value(manager.with_untracked(|m| palette_entries(m.catalog())));
    let query = create_rw_signal(String::new());
    let is_open = create_memo(move |_| manager.with(|m| m.state().command_palette_open));

    // Each opening starts with an empty search.
    create_effect(move |_| {
        if !is_open.get() {
            query.set(String::new());
        }
    });

    let close = move || runtime.dispatch_action(DesktopAction::SetCommandPaletteOpen { open: false });

    let rows = move |group: PaletteGroup| {
        let needle = query.get();
        entries.with_value(|entries| {
            filter_entries(entries, &needle)
                .into_iter()
                .filter(|entry| entry.group == group)
                .map(|entry| {
                    let command = entry.command();
                    view! {
                        <li
                            class="palette-item"
                            role="option"
                            on:click=move |_| runtime.dispatch_action(command.clone())
                        >
                            <span class="palette-item-label">{entry.label.clone()}</span>
                            <span class="palette-item-hint">{entry.hint}</span>
                        </li>
                    }
                })
                .collect_view()
        })
    };
    let has_results = move || {
        let needle = query.get();
        entries.with_value(|entries| !filter_entries(entries, &needle).is_empty())
    };

    view! {
        <Show when=move || is_open.get() fallback=|| ()>
            <div
                class="palette-overlay"
                on:click=move |ev| {
                    if ev.target() == ev.current_target() {
                        close();
                    }
                }
            >
                <div class="palette" role="dialog" aria-label="Command palette">
                    <input
                        class="palette-input"
                        autofocus=true
                        placeholder="Search apps, projects, or commands..."
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                    <Show
                        when=has_results
                        fallback=|| view! { <p class="palette-empty">"No results found."</p> }
                    >
                        {PaletteGroup::ALL
                            .into_iter()
                            .map(|group| {
                                view! {
                                    <section class="palette-group">
                                        <h2 class="palette-group-heading">{group.heading()}</h2>
                                        <ul role="listbox">{move || rows(group)}</ul>
                                    </section>
                                }
                            })
                            .collect_view()}
                    </Show>
                </div>
            </div>
        </Show>
    }
}
