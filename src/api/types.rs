//! Response shapes served by the producoes backend.

use serde::Deserialize;

/// One page of results.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Paginated<T> {
	/// Records on this page.
	pub items: Vec<T>,
	/// Total number of matching records across all pages.
	pub total: u64,
	/// 1-based page number.
	pub page: u32,
	/// Page size the backend applied.
	#[serde(alias = "size")]
	pub per_page: u32,
}

/// An academic production (article, book, thesis, ...).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProductionRecord {
	/// Backend identifier.
	pub id: i64,
	/// Title of the work.
	#[serde(rename = "titulo")]
	pub title: String,
	/// Production type, e.g. "artigo" or "livro".
	#[serde(rename = "tipo")]
	pub kind: String,
	/// Publication year.
	#[serde(rename = "ano")]
	pub year: i32,
	/// Campus the production is attributed to.
	pub campus: Option<String>,
	/// Knowledge grand area.
	#[serde(rename = "grande_area")]
	pub grand_area: Option<String>,
	/// Knowledge area within the grand area.
	pub area: Option<String>,
	/// Author names; empty when the backend omits them.
	#[serde(rename = "autores", default)]
	pub authors: Vec<String>,
}

/// Aggregated count used by the dashboard charts.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChartStat {
	/// Year the count covers.
	#[serde(rename = "ano")]
	pub year: i32,
	/// Production type counted.
	#[serde(rename = "tipo")]
	pub kind: String,
	/// Number of productions.
	pub total: u64,
}
