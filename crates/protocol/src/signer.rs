//! External payment-signer collaborator trait

use async_trait::async_trait;
use std::fmt::Debug;

use stablepay_types::SignerError;

/// External wallet/transaction signer
///
/// Given a payment tuple, produces an opaque settlement reference
/// (transaction hash or signed receipt). This core never inspects signer
/// internals and never broadcasts transactions itself.
#[async_trait]
pub trait PaymentSigner: Send + Sync + Debug {
	/// The wallet address payments are signed from
	fn wallet_address(&self) -> &str;

	/// Settle a transfer and return the settlement reference
	async fn transfer(
		&self,
		recipient: &str,
		amount: &str,
		token: &str,
		chain: &str,
	) -> Result<String, SignerError>;
}
