//! HTTP client for the producoes backend.

use log::debug;
use reqwest::{Client, StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, Result};
use super::query::{ProductionFilters, QueryParams, StatsFilters};
use super::types::{ChartStat, Paginated, ProductionRecord};

/// Backend used when `PRODUCOES_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Longest slice of an error body kept in [`ApiError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Where the client sends its requests.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	/// Root of the REST API, e.g. `http://localhost:8000/api`.
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: option_env!("PRODUCOES_API_URL")
				.unwrap_or(DEFAULT_API_URL)
				.to_string(),
		}
	}
}

/// Typed GET client. Every method maps to one endpoint.
#[derive(Clone, Debug)]
pub struct ProducoesClient {
	http: Client,
	base_url: Url,
}

impl ProducoesClient {
	/// Client for the API rooted at `base_url`.
	pub fn new(base_url: &str) -> Result<Self> {
		// A trailing slash makes `join` append instead of replacing the last segment.
		let normalized = if base_url.ends_with('/') {
			base_url.to_string()
		} else {
			format!("{}/", base_url)
		};
		let base_url = Url::parse(&normalized).map_err(|source| ApiError::InvalidBaseUrl {
			url: base_url.to_string(),
			source,
		})?;
		Ok(Self {
			http: Client::new(),
			base_url,
		})
	}

	/// Client for `config.base_url`.
	pub fn from_config(config: &ApiConfig) -> Result<Self> {
		Self::new(&config.base_url)
	}

	/// Normalized base URL, always ending in `/`.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Full request URL for `path` (relative to the base) with `params`.
	pub fn endpoint(&self, path: &str, params: &QueryParams) -> Result<Url> {
		let mut url = self
			.base_url
			.join(path)
			.map_err(|source| ApiError::InvalidBaseUrl {
				url: format!("{}{}", self.base_url, path),
				source,
			})?;
		if !params.is_empty() {
			url.query_pairs_mut().extend_pairs(params.pairs());
		}
		Ok(url)
	}

	async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
		debug!("producoes-graph: GET {}", url);
		let response = self
			.http
			.get(url)
			.header(ACCEPT, "application/json")
			.send()
			.await?;
		let status = response.status();
		let body = response.text().await?;
		decode_body(status, &body)
	}

	/// URL of [`ProducoesClient::list_grand_areas`].
	pub fn grand_areas_url(&self, campus: Option<&str>) -> Result<Url> {
		self.endpoint("grandes-areas", &QueryParams::new().text("campus", campus))
	}

	/// URL of [`ProducoesClient::list_areas`].
	pub fn areas_url(&self, campus: Option<&str>, grand_area: Option<&str>) -> Result<Url> {
		let params = QueryParams::new()
			.text("campus", campus)
			.text("grande_area", grand_area);
		self.endpoint("areas", &params)
	}

	/// URL of [`ProducoesClient::list_campuses`].
	pub fn campuses_url(&self) -> Result<Url> {
		self.endpoint("campus", &QueryParams::new())
	}

	/// URL of [`ProducoesClient::list_productions`].
	pub fn productions_url(&self, filters: &ProductionFilters) -> Result<Url> {
		self.endpoint("producoes", &filters.to_query())
	}

	/// URL of [`ProducoesClient::chart_stats`].
	pub fn chart_stats_url(&self, filters: &StatsFilters) -> Result<Url> {
		self.endpoint("producoes/stats", &filters.to_query())
	}

	/// Grand area names, optionally limited to one campus.
	pub async fn list_grand_areas(&self, campus: Option<&str>) -> Result<Vec<String>> {
		self.get(self.grand_areas_url(campus)?).await
	}

	/// Area names, optionally limited by campus and grand area.
	pub async fn list_areas(&self, campus: Option<&str>, grand_area: Option<&str>) -> Result<Vec<String>> {
		self.get(self.areas_url(campus, grand_area)?).await
	}

	/// All campus names.
	pub async fn list_campuses(&self) -> Result<Vec<String>> {
		self.get(self.campuses_url()?).await
	}

	/// One page of productions matching `filters`.
	pub async fn list_productions(&self, filters: &ProductionFilters) -> Result<Paginated<ProductionRecord>> {
		self.get(self.productions_url(filters)?).await
	}

	/// Per-year, per-type counts matching `filters`.
	pub async fn chart_stats(&self, filters: &StatsFilters) -> Result<Vec<ChartStat>> {
		self.get(self.chart_stats_url(filters)?).await
	}
}

/// Check the status, then decode the JSON body into `T`.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
	if !status.is_success() {
		return Err(ApiError::Status {
			status,
			body: body.chars().take(ERROR_BODY_LIMIT).collect(),
		});
	}
	Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn client() -> ProducoesClient {
		ProducoesClient::new("http://api.test/v1").unwrap()
	}

	#[test]
	fn production_query_contains_only_given_filters() {
		let filters = ProductionFilters {
			campus: Some("UFX".into()),
			year_gte: Some(2020),
			..Default::default()
		};
		let url = client().productions_url(&filters).unwrap();
		assert_eq!(url.path(), "/v1/producoes");
		assert_eq!(url.query(), Some("campus=UFX&ano_gte=2020"));
	}

	#[test]
	fn no_filters_means_no_query_string() {
		let url = client().productions_url(&ProductionFilters::default()).unwrap();
		assert_eq!(url.as_str(), "http://api.test/v1/producoes");
		assert_eq!(client().campuses_url().unwrap().query(), None);
	}

	#[test]
	fn listing_endpoints_take_optional_filters() {
		let c = client();
		assert_eq!(
			c.grand_areas_url(Some("Sul")).unwrap().as_str(),
			"http://api.test/v1/grandes-areas?campus=Sul"
		);
		assert_eq!(
			c.areas_url(None, Some("Humanas")).unwrap().as_str(),
			"http://api.test/v1/areas?grande_area=Humanas"
		);
		let stats = StatsFilters {
			campus: Some("UFX".into()),
			person_id: Some("7".into()),
			..Default::default()
		};
		assert_eq!(
			c.chart_stats_url(&stats).unwrap().as_str(),
			"http://api.test/v1/producoes/stats?campus=UFX&pessoa_id=7"
		);
	}

	#[test]
	fn types_are_comma_joined() {
		let filters = ProductionFilters {
			types: vec!["artigo".into(), "livro".into()],
			..Default::default()
		};
		let url = client().productions_url(&filters).unwrap();
		let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
		assert_eq!(pairs, vec![("tipos".to_string(), "artigo,livro".to_string())]);
	}

	#[test]
	fn trailing_slash_base_is_accepted() {
		let c = ProducoesClient::new("http://api.test/v1/").unwrap();
		assert_eq!(c.campuses_url().unwrap().as_str(), "http://api.test/v1/campus");
	}

	#[test]
	fn invalid_base_url_is_reported() {
		assert!(matches!(
			ProducoesClient::new("not a url"),
			Err(ApiError::InvalidBaseUrl { .. })
		));
	}

	#[test]
	fn decodes_paginated_productions() {
		let body = r#"{
			"items": [{
				"id": 1,
				"titulo": "Redes neurais em solos tropicais",
				"tipo": "artigo",
				"ano": 2021,
				"campus": "UFX",
				"grande_area": "Agrárias",
				"area": "Agronomia",
				"autores": ["Silva", "Souza"]
			}],
			"total": 31,
			"page": 1,
			"per_page": 10
		}"#;
		let page: Paginated<ProductionRecord> = decode_body(StatusCode::OK, body).unwrap();
		assert_eq!(page.total, 31);
		assert_eq!(page.items.len(), 1);
		assert_eq!(page.items[0].year, 2021);
		assert_eq!(page.items[0].authors, vec!["Silva", "Souza"]);
	}

	#[test]
	fn decodes_string_lists_and_stats() {
		let campuses: Vec<String> = decode_body(StatusCode::OK, r#"["UFX", "UFY"]"#).unwrap();
		assert_eq!(campuses, vec!["UFX", "UFY"]);

		let stats: Vec<ChartStat> =
			decode_body(StatusCode::OK, r#"[{"ano": 2020, "tipo": "livro", "total": 4}]"#).unwrap();
		assert_eq!(stats[0].kind, "livro");
	}

	#[test]
	fn error_status_is_not_decoded() {
		let long = "x".repeat(500);
		match decode_body::<Vec<String>>(StatusCode::INTERNAL_SERVER_ERROR, &long) {
			Err(ApiError::Status { status, body }) => {
				assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
				assert_eq!(body.len(), ERROR_BODY_LIMIT);
			}
			other => panic!("expected status error, got {:?}", other),
		}
	}

	#[test]
	fn wrong_shape_is_a_decode_error() {
		let result = decode_body::<Paginated<ProductionRecord>>(StatusCode::OK, r#"["UFX"]"#);
		assert!(matches!(result, Err(ApiError::Decode(_))));
	}
}
