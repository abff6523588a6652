//! File uploads for the rich-text editor and the cached price feed.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiRequest, FilePart, HttpTransport},
};

/// Location of a stored upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
	/// Public URL of the stored file.
	pub url: String,
}

/// Cached spot price for one trading pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
	/// Trading pair symbol, e.g. `BTCUSDT`.
	pub symbol: String,
	/// Last traded price.
	pub price: f64,
	/// 24 hour change in percent.
	#[serde(rename = "changePercent")]
	pub change_percent: f64,
}
impl PriceQuote {
	/// Returns `true` when the 24 hour change is zero or positive.
	pub fn is_up(&self) -> bool {
		self.change_percent >= 0.
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Uploads a file as the multipart field `file`.
	pub async fn upload_file(
		&self,
		file_name: &str,
		mime: &str,
		bytes: impl Into<Vec<u8>>,
	) -> Result<UploadedFile> {
		let part = FilePart::new("file", file_name, mime, bytes)?;

		self.send(ApiRequest::post("upload/").with_multipart(part)).await?.json()
	}

	/// Cached prices maintained by the backend.
	pub async fn crypto_prices(&self) -> Result<Vec<PriceQuote>> {
		self.get_json("crypto/prices/").await
	}
}
