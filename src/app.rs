//! Root application module.
//!
//! Contains the main App component, the AppContext definition, and the
//! signal-backed query store the orchestrator writes through.

use leptos::prelude::*;
use tokenscope_core::{
    InputClassification, QueryOrchestrator, QueryState, QueryStore, RenderModel, WalletSession,
};

use crate::components::Shell;
use crate::config::AppConfig;
use crate::core::{AlchemyClient, Eip1193Wallet};
use crate::utils::dom;

// ============================================================================
// SignalStore
// ============================================================================

/// [`QueryStore`] over a Leptos signal.
///
/// Every dispatched event is one `update`, so subscribers never observe a
/// half-applied transition.
#[derive(Clone, Copy)]
pub struct SignalStore(pub RwSignal<QueryState>);

impl QueryStore for SignalStore {
    fn read<R>(&self, f: impl FnOnce(&QueryState) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn write(&self, f: impl FnOnce(&mut QueryState)) {
        self.0.update(f);
    }
}

/// Orchestrator wired to the browser providers.
pub type Orchestrator = QueryOrchestrator<Eip1193Wallet, AlchemyClient, SignalStore>;

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read with
/// `use_context::<AppContext>()`. All fields are signals, so the context is
/// `Copy`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Query state machine. Written only through [`Orchestrator`].
    pub query: RwSignal<QueryState>,

    /// Wallet connection state.
    pub session: RwSignal<WalletSession>,

    /// Contents of the address field.
    pub address_input: RwSignal<String>,

    /// Live classification of `address_input`.
    pub input_hint: RwSignal<InputClassification>,

    /// Last wallet connect failure, shown next to the connect button.
    pub wallet_error: RwSignal<Option<String>>,

    pub config: StoredValue<AppConfig>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            query: RwSignal::new(QueryState::new()),
            session: RwSignal::new(WalletSession::disconnected()),
            address_input: RwSignal::new(String::new()),
            input_hint: RwSignal::new(InputClassification::Empty),
            wallet_error: RwSignal::new(None),
            config: StoredValue::new(config),
        }
    }

    /// Build an orchestrator over the current providers.
    ///
    /// Cheap: all query state lives in `query`, so a fresh orchestrator per
    /// action sees the same generation counter and ENS cache.
    pub fn orchestrator(&self) -> Orchestrator {
        let api = self.config.with_value(AlchemyClient::new);
        QueryOrchestrator::new(Eip1193Wallet::detect(), api, SignalStore(self.query))
    }

    /// Reactive view model for the results area.
    pub fn render_model(&self) -> RenderModel {
        self.query.with(QueryState::render)
    }

    /// Replace the address field and refresh its hint.
    ///
    /// Clearing the field resets any displayed query.
    pub fn set_address_input(&self, value: String) {
        let hint = self.orchestrator().input_changed(&value);
        self.input_hint.set(hint);
        self.address_input.set(value);
    }
}

/// Root application component with error boundary.
#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let ctx = AppContext::new(config);
    provide_context(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    min-height: 100vh;
                    padding: 2rem;
                    background: #0f1117;
                    color: #e6e6e6;
                    font-family: system-ui, sans-serif;
                ">
                    <div style="max-width: 600px; text-align: center;">
                        <h1 style="color: #ff6b6b; margin-bottom: 1rem;">
                            "Something went wrong"
                        </h1>
                        <p style="color: #a0a0a0; margin-bottom: 2rem;">
                            "The viewer hit an unexpected error. Reloading usually fixes it."
                        </p>
                        <ul style="text-align: left; color: #ff6b6b; font-size: 0.9rem;">
                            {move || errors.get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                            }
                        </ul>
                        <button
                            on:click=move |_| dom::reload()
                            style="
                                background: #4a90e2;
                                color: white;
                                border: none;
                                padding: 0.75rem 2rem;
                                border-radius: 4px;
                                cursor: pointer;
                                font-size: 1rem;
                            "
                        >
                            "Reload Page"
                        </button>
                    </div>
                </div>
            }
        >
            <Shell />
        </ErrorBoundary>
    }
}
