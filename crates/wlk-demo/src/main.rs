//! Drives the full wallet-link round trip in one process: the dapp side
//! goes through the real connect and sign flows while `SimulatedWallet`
//! plays the wallet application.

use url::Url;

use wlk_core::{
    config::LinkConfig,
    connect::{build_connect_url, CallbackOutcome, ConnectHandler},
    harness::SimulatedWallet,
    keys::KeypairStore,
    session::{disconnect, SessionStore},
    sign::build_sign_url,
    store::InMemoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LinkConfig::default();
    config.validate()?;

    let store = InMemoryStore::new_shared();
    let keys = KeypairStore::new(store.clone());
    let sessions = SessionStore::new(store.clone());

    // 1) Dapp builds the connect deep link and hands control to the wallet.
    let connect_url = build_connect_url(&config, &keys).await?;
    println!("connect URL:\n  {connect_url}\n");

    // 2) Wallet approves and redirects back with encrypted parameters.
    let wallet = SimulatedWallet::new("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin", "demo-session-token")?;
    let callback = wallet.approve_connect(&connect_url)?;

    // 3) Dapp handles the callback and materializes the session.
    let mut handler = ConnectHandler::new(store.clone());
    match handler.handle_callback(&callback).await? {
        CallbackOutcome::Established(session) => {
            println!("connected to wallet {}\n", session.wallet_address);
        }
        CallbackOutcome::Ignored => anyhow::bail!("callback unexpectedly ignored"),
    }

    // 4) Dapp requests a signature over an opaque transaction blob.
    let redirect = Url::parse(&config.app.redirect_url)?;
    let unsigned_tx = b"demo unsigned transaction bytes";
    let sign_url = build_sign_url(&config, &keys, &sessions, unsigned_tx, &redirect).await?;
    println!("sign-and-send URL:\n  {sign_url}\n");

    // 5) Wallet decrypts the request on its side.
    let request = wallet.open_sign_request(&sign_url)?;
    println!(
        "wallet decrypted: session={} transaction={:?}\n",
        request.session,
        String::from_utf8_lossy(&bs58::decode(&request.transaction).into_vec()?),
    );

    // 6) Disconnect clears all persisted link state.
    disconnect(&keys, &sessions).await?;
    println!("disconnected");

    Ok(())
}
