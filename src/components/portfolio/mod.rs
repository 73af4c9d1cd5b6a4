//! Query status and token table.
//!
//! Everything here is drawn from [`RenderModel`], which only carries tokens
//! once a query is done. Loading, error and results are mutually exclusive.

use leptos::prelude::*;
use leptos_icons::Icon;
use tokenscope_core::{EnsDisplay, ErrorKind, Phase, RenderModel, TokenView};

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::EXPLORER_TOKEN_URL;

stylance::import_crate_style!(css, "src/components/portfolio/portfolio.module.css");

#[component]
fn StatusLine(message: String) -> impl IntoView {
    view! {
        <div class=css::loading>
            <span class=css::spinner></span>
            {message}
        </div>
    }
}

#[component]
fn ErrorPanel(kind: ErrorKind, message: String) -> impl IntoView {
    let icon = match kind {
        ErrorKind::Credential | ErrorKind::Auth => ic::LOCK,
        _ => ic::INFO,
    };
    let hint = match kind {
        ErrorKind::Credential => Some("Set an API key in config.toml and rebuild."),
        kind if kind.is_transient() => Some("This is usually temporary. Submit again to retry."),
        _ => None,
    };

    view! {
        <div class=css::error role="alert">
            <span class=css::errorIcon><Icon icon=icon /></span>
            <div>
                <p class=css::errorMessage>{message}</p>
                {hint.map(|text| view! { <p class=css::errorHint>{text}</p> })}
            </div>
        </div>
    }
}

#[component]
fn EnsBadge(ens: EnsDisplay) -> impl IntoView {
    view! {
        <div class=css::ens>
            <span class=css::ensName>{ens.name}</span>
            <span class=css::ensArrow>"→"</span>
            <code class=css::ensAddress>{ens.resolved_address}</code>
        </div>
    }
}

#[component]
fn TokenRow(token: TokenView) -> impl IntoView {
    let explorer_url = format!("{}{}", EXPLORER_TOKEN_URL, token.contract_address);
    let title = token
        .name
        .clone()
        .unwrap_or_else(|| token.symbol.clone());

    view! {
        <tr class=css::row>
            <td class=css::token title=title>
                {match token.logo_url {
                    Some(url) => view! { <img class=css::logo src=url alt="" loading="lazy" /> }.into_any(),
                    None => view! { <span class=css::logoPlaceholder></span> }.into_any(),
                }}
                <span class=css::symbol>{token.symbol}</span>
                {token.name.map(|name| view! { <span class=css::tokenName>{name}</span> })}
            </td>
            <td class=css::balance>{token.formatted_balance}</td>
            <td class=css::contract>
                <a
                    href=explorer_url
                    target="_blank"
                    rel="noopener noreferrer"
                    title=token.contract_address
                >
                    {token.short_address}
                    <Icon icon=ic::EXTERNAL_LINK />
                </a>
            </td>
        </tr>
    }
}

#[component]
fn TokenTable(tokens: Vec<TokenView>) -> impl IntoView {
    if tokens.is_empty() {
        return view! { <p class=css::empty>"No ERC-20 tokens found for this address."</p> }
            .into_any();
    }

    let count = tokens.len();
    view! {
        <div>
            <p class=css::summary>{format!("{} tokens", count)}</p>
            <table class=css::table>
                <thead>
                    <tr>
                        <th>"Token"</th>
                        <th class=css::balance>"Balance"</th>
                        <th>"Contract"</th>
                    </tr>
                </thead>
                <tbody>
                    {tokens
                        .into_iter()
                        .map(|token| view! { <TokenRow token=token /> })
                        .collect::<Vec<_>>()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
pub fn Portfolio() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let model = Memo::new(move |_| ctx.render_model());

    view! {
        <section class=css::panel>
            {move || model.with(|m| m.ens_display.clone()).map(|ens| view! { <EnsBadge ens=ens /> })}

            {move || {
                let RenderModel { phase, loading_message, error_kind, error_message, tokens, .. } =
                    model.get();
                match phase {
                    Phase::Idle => view! {
                        <p class=css::idle>"Enter an address or ENS name to see its ERC-20 balances."</p>
                    }
                    .into_any(),
                    Phase::Failed => view! {
                        <ErrorPanel
                            kind=error_kind.unwrap_or(ErrorKind::Unknown)
                            message=error_message.unwrap_or_default()
                        />
                    }
                    .into_any(),
                    Phase::Done => view! { <TokenTable tokens=tokens /> }.into_any(),
                    _ => view! { <StatusLine message=loading_message.unwrap_or_default() /> }
                        .into_any(),
                }
            }}
        </section>
    }
}
