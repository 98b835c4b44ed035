use crate::cli::context::{format_timestamp, Context};
use crate::cli::SocialCommands;
use anyhow::{anyhow, Result};
use quintle::config::ProviderSettings;
use social::{
    accept_message, await_oauth, exchange_code, AuthorizationRequest, ConnectOutcome, PkcePair,
    SessionStore, SocialSession, TokenRequest,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

pub async fn handle_social_command(ctx: Context, command: SocialCommands) -> Result<()> {
    let store = SessionStore::new(&ctx.config.social.session_file);
    store.hydrate().await?;

    match command {
        SocialCommands::Connect {
            provider,
            origin,
            account,
        } => connect(&ctx, &store, provider, origin, account).await,

        SocialCommands::List => {
            let sessions = store.sessions().await;
            if sessions.is_empty() {
                println!("No linked accounts");
            }
            for session in sessions {
                println!(
                    "🔗 {:<10} @{}  linked {}{}",
                    session.provider,
                    session.username,
                    format_timestamp(session.connected_at),
                    session
                        .account
                        .as_ref()
                        .map(|a| format!(" to {}", a))
                        .unwrap_or_default()
                );
            }
            Ok(())
        }

        SocialCommands::Disconnect { provider } => {
            if store.disconnect(&provider).await? {
                println!("✅ Unlinked {}", provider);
            } else {
                println!("ℹ️  No {} account linked", provider);
            }
            Ok(())
        }

        SocialCommands::AuthorizeUrl { provider } => {
            let request = authorization_request(provider_settings(&ctx, &provider)?);
            println!("{}", request.url()?);
            println!();
            println!("state:         {}", request.state);
            println!("code_verifier: {}", request.pkce.verifier);
            Ok(())
        }

        SocialCommands::Exchange {
            provider,
            code,
            verifier,
        } => {
            let settings = provider_settings(&ctx, &provider)?;
            let pkce = PkcePair::from_verifier(&verifier)?;
            let tokens = exchange(&ctx, settings, code, pkce.verifier).await?;
            println!("✅ Received {} token", tokens.token_type.as_deref().unwrap_or("access"));
            if let Some(expires_in) = tokens.expires_in {
                println!("   Expires in {}s", expires_in);
            }
            if let Some(scope) = &tokens.scope {
                println!("   Scope: {}", scope);
            }
            Ok(())
        }
    }
}

fn provider_settings<'a>(ctx: &'a Context, provider: &str) -> Result<&'a ProviderSettings> {
    ctx.config
        .provider(provider)
        .ok_or_else(|| anyhow!("Provider {} is not configured under [social.providers]", provider))
}

fn authorization_request(settings: &ProviderSettings) -> AuthorizationRequest {
    AuthorizationRequest::new(
        &settings.authorize_url,
        &settings.client_id,
        &settings.redirect_uri,
        &settings.scope,
    )
}

async fn exchange(
    ctx: &Context,
    settings: &ProviderSettings,
    code: String,
    code_verifier: String,
) -> Result<social::TokenResponse> {
    let request = TokenRequest {
        token_url: settings.token_url.clone(),
        client_id: settings.client_id.clone(),
        redirect_uri: settings.redirect_uri.clone(),
        code,
        code_verifier,
    };
    let timeout = Duration::from_secs(ctx.config.social.exchange_timeout_secs);
    Ok(exchange_code(&reqwest::Client::new(), &request, timeout).await?)
}

async fn connect(
    ctx: &Context,
    store: &SessionStore,
    provider: String,
    origin: Option<String>,
    account: Option<String>,
) -> Result<()> {
    let expected_origin = ctx.config.social.expected_origin.clone();
    let origin = origin.unwrap_or_else(|| expected_origin.clone());
    let account = ctx.account(account.as_deref())?;

    let request = ctx.config.provider(&provider).map(authorization_request);
    match &request {
        Some(request) => {
            println!("🔐 Open this URL to authorize {}:", provider);
            println!("{}", request.url()?);
        }
        None => println!("🔐 Waiting for the {} popup", provider),
    }
    println!("Paste the popup message JSON, one per line (EOF closes the popup)");

    let (messages_tx, messages_rx) = mpsc::channel(8);
    let (closed_tx, closed_rx) = oneshot::channel();

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if let Some(message) = accept_message(&origin, &expected_origin, &line) {
                        if messages_tx.send(message).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    let _ = closed_tx.send(());
                    return;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    let _ = closed_tx.send(());
                    return;
                }
            }
        }
    });

    let timeout = Duration::from_secs(ctx.config.social.connect_timeout_secs);
    let outcome = await_oauth(messages_rx, closed_rx, timeout).await;
    reader.abort();

    match outcome {
        ConnectOutcome::Connected {
            provider: connected,
            profile,
        } => {
            if connected != provider {
                warn!("Popup reported provider {} while connecting {}", connected, provider);
            }

            if let (Some(code), Some(request), Some(settings)) =
                (profile.code.clone(), &request, ctx.config.provider(&provider))
            {
                exchange(ctx, settings, code, request.pkce.verifier.clone()).await?;
                debug!("Authorization code exchanged for {}", provider);
            }

            let mut session = SocialSession::new(&provider, &profile.username);
            session.user_id = profile.user_id;
            session.account = account.map(|a| a.to_checksum(None));
            store.connect(session).await?;
            println!("✅ Linked {} account @{}", provider, profile.username);
            Ok(())
        }
        ConnectOutcome::Failed(reason) => Err(anyhow!("{} authorization failed: {}", provider, reason)),
        ConnectOutcome::TimedOut => Err(anyhow!("{} authorization timed out after {:?}", provider, timeout)),
        ConnectOutcome::Cancelled => {
            println!("ℹ️  Connection cancelled");
            Ok(())
        }
    }
}
