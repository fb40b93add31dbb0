//! Previous/next page controls shared by paginated lists.

use leptos::prelude::*;

#[component]
pub fn PageControls(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    on_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <nav class="pagination">
                <button
                    class="btn pagination__prev"
                    disabled=move || { page.get() <= 1 }
                    on:click=move |_| on_change.run(page.get_untracked().saturating_sub(1).max(1))
                >
                    "‹ Previous"
                </button>
                <span class="pagination__label">
                    {move || format!("Page {} of {}", page.get(), total_pages.get())}
                </span>
                <button
                    class="btn pagination__next"
                    disabled=move || { page.get() >= total_pages.get() }
                    on:click=move |_| on_change.run((page.get_untracked() + 1).min(total_pages.get_untracked()))
                >
                    "Next ›"
                </button>
            </nav>
        </Show>
    }
}
