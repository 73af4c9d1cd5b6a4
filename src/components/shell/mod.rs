//! Page layout and startup effects.

use leptos::prelude::*;
use tokenscope_core::session;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::lookup::LookupForm;
use crate::components::portfolio::Portfolio;
use crate::components::wallet::{WalletBar, end_session};
use crate::config::{APP_NAME, APP_VERSION};
use crate::core::{Eip1193Wallet, wallet};

stylance::import_crate_style!(css, "src/components/shell/shell.module.css");

// ============================================================================
// Effect Setup Functions
// ============================================================================

/// Silently restore an authorized wallet session.
///
/// Skipped when the user explicitly disconnected on a previous visit.
fn restore_session(ctx: AppContext) {
    if wallet::is_disconnect_remembered() {
        log::debug!("wallet auto-detect skipped after explicit disconnect");
        return;
    }

    spawn_local(async move {
        let provider = Eip1193Wallet::detect();
        let restored = session::auto_detect(provider.as_ref()).await;
        if let Some(address) = &restored.address {
            ctx.set_address_input(address.to_string());
        }
        ctx.session.set(restored);
    });
}

/// Follow account switches in the wallet while connected.
fn setup_wallet_events(ctx: AppContext) {
    let Some(provider) = Eip1193Wallet::detect() else {
        return;
    };

    let registered = provider.on_accounts_changed(move |accounts: Vec<String>| {
        if !ctx.session.with_untracked(|s| s.is_connected()) {
            return;
        }

        let next = session::accounts_changed(&accounts);
        match &next.address {
            Some(address) => {
                ctx.set_address_input(address.to_string());
                ctx.session.set(next);
            }
            None => end_session(ctx),
        }
    });

    if let Err(e) = registered {
        log::warn!("accountsChanged listener not registered: {}", e);
    }
}

// ============================================================================
// Shell Component
// ============================================================================

#[component]
pub fn Shell() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    // Startup runs once
    let started = StoredValue::new(false);
    Effect::new(move || {
        if !started.get_value() {
            started.set_value(true);
            restore_session(ctx);
            setup_wallet_events(ctx);
        }
    });

    view! {
        <div class=css::page>
            <header class=css::header>
                <span class=css::brand>
                    {APP_NAME}
                    <span class=css::version>{format!("v{}", APP_VERSION)}</span>
                </span>
                <WalletBar />
            </header>

            <main class=css::main>
                <LookupForm />
                <Portfolio />
            </main>
        </div>
    }
}
