//! Stablepay relay server entrypoint

use stablepay_relay::RelayBuilder;

#[tokio::main]
async fn main() {
	if let Err(e) = RelayBuilder::default().start_server().await {
		eprintln!("Failed to start stablepay relay: {}", e);
		std::process::exit(1);
	}
}
