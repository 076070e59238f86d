use http::StatusCode;
use micro_h1::handler::make_handler;
use micro_h1::protocol::{Request, Response};
use micro_h1::server::{Server, ServerConfig};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::bind(ServerConfig::default(), make_handler(hello_world)).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "can't start server");
            return;
        }
    };
    info!(addr = %server.local_addr(), "try: curl -v http://{}/coffee", server.local_addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "can't listen for ctrl-c");
    }
    server.close().await;
}

async fn hello_world(request: Request) -> Response {
    info!("received request\n{request}");
    Response::new(StatusCode::OK, "Hello World!\r\n")
}
