//! Wallet connect/disconnect bar.

use leptos::prelude::*;
use leptos_icons::Icon;
use tokenscope_core::{InputClassification, session};
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::{Eip1193Wallet, wallet};

stylance::import_crate_style!(css, "src/components/wallet/wallet.module.css");

/// Ask the wallet for access and adopt the returned account.
fn handle_connect(ctx: AppContext, connecting: RwSignal<bool>) {
    connecting.set(true);
    ctx.wallet_error.set(None);

    spawn_local(async move {
        let provider = Eip1193Wallet::detect();
        match session::connect(provider.as_ref()).await {
            Ok(connected) => {
                wallet::remember_disconnect(false);
                if let Some(address) = &connected.address {
                    ctx.set_address_input(address.to_string());
                }
                ctx.session.set(connected);
            }
            Err(e) => {
                log::info!("wallet connect failed: {}", e);
                ctx.wallet_error.set(Some(e.to_string()));
            }
        }
        connecting.set(false);
    });
}

/// Disconnect and clear everything the session produced.
///
/// Query state is reset in one transition, so a query still in flight can
/// no longer render.
pub fn end_session(ctx: AppContext) {
    let orchestrator = ctx.orchestrator();
    let mut current = ctx.session.get_untracked();
    session::disconnect(&mut current, &orchestrator);
    ctx.session.set(current);
    ctx.address_input.set(String::new());
    ctx.input_hint.set(InputClassification::Empty);
}

#[component]
pub fn WalletBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let connecting = RwSignal::new(false);

    let session_name = Signal::derive(move || ctx.session.with(|s| s.display_name()));
    let is_connected = Signal::derive(move || ctx.session.with(|s| s.is_connected()));

    let on_connect = move |_: leptos::ev::MouseEvent| handle_connect(ctx, connecting);
    let on_disconnect = move |_: leptos::ev::MouseEvent| {
        wallet::remember_disconnect(true);
        end_session(ctx);
    };

    view! {
        <div class=css::bar>
            <span class=css::session>
                <span class=css::icon><Icon icon=ic::USER /></span>
                <span class=css::name>{session_name}</span>
            </span>

            {move || if is_connected.get() {
                view! {
                    <button class=css::button on:click=on_disconnect title="Disconnect wallet">
                        <Icon icon=ic::CLOSE />
                        "Disconnect"
                    </button>
                }.into_any()
            } else {
                view! {
                    <button
                        class=css::buttonPrimary
                        on:click=on_connect
                        disabled=move || connecting.get()
                    >
                        <Icon icon=ic::WALLET />
                        {move || if connecting.get() { "Connecting..." } else { "Connect wallet" }}
                    </button>
                }.into_any()
            }}

            {move || ctx.wallet_error.get().map(|message| view! {
                <span class=css::error>{message}</span>
            })}
        </div>
    }
}
