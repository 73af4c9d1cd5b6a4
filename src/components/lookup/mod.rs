//! Address / ENS lookup form.

use leptos::prelude::*;
use leptos_icons::Icon;
use tokenscope_core::InputClassification;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/lookup/lookup.module.css");

/// Run a query for the current field contents.
///
/// Each submit gets a new generation; an older query still in flight is
/// superseded and its late results are discarded.
fn handle_submit(ctx: AppContext) {
    let input = ctx.address_input.get_untracked();
    spawn_local(async move {
        ctx.orchestrator().submit(&input).await;
    });
}

#[component]
pub fn LookupForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let hint = Signal::derive(move || ctx.input_hint.with(InputClassification::hint));
    let hint_class = Signal::derive(move || {
        ctx.input_hint.with(|h| match h {
            InputClassification::Invalid(_) => css::hintInvalid,
            _ => css::hint,
        })
    });

    let on_input = move |ev: leptos::ev::Event| {
        ctx.set_address_input(event_target_value(&ev));
    };
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        handle_submit(ctx);
    };

    Effect::new(move || {
        dom::focus_element("#lookup-input");
    });

    view! {
        <form class=css::form on:submit=on_submit>
            <div class=css::row>
                <input
                    id="lookup-input"
                    class=css::input
                    type="text"
                    placeholder="0x address or ENS name (vitalik.eth)"
                    spellcheck="false"
                    autocomplete="off"
                    prop:value=move || ctx.address_input.get()
                    on:input=on_input
                />
                <button class=css::submit type="submit">
                    <Icon icon=ic::SEARCH />
                    "Look up"
                </button>
            </div>
            <p class=move || hint_class.get()>{move || hint.get().unwrap_or_default()}</p>
        </form>
    }
}
