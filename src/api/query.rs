//! Filter sets and their query-string encoding.
//!
//! Absent filters are omitted entirely, and so are empty strings, empty
//! lists and zero numbers: the backend treats all of those as "no filter".
//! Parameters are emitted in declaration order so URLs are stable.

/// Ordered query parameters, skipping empty values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
	/// No parameters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add `key` unless `value` is absent or empty.
	pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
		if let Some(v) = value.filter(|v| !v.is_empty()) {
			self.0.push((key, v.to_string()));
		}
		self
	}

	/// Add `key` unless `value` is absent or zero.
	pub fn number<N>(mut self, key: &'static str, value: Option<N>) -> Self
	where
		N: Copy + Default + PartialEq + ToString,
	{
		if let Some(v) = value.filter(|v| *v != N::default()) {
			self.0.push((key, v.to_string()));
		}
		self
	}

	/// Comma-joined list.
	pub fn list(mut self, key: &'static str, values: &[String]) -> Self {
		let joined = values
			.iter()
			.filter(|v| !v.is_empty())
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(",");
		if !joined.is_empty() {
			self.0.push((key, joined));
		}
		self
	}

	/// Whether no parameter survived.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Parameters in insertion order.
	pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (*k, v.as_str()))
	}
}

/// Filters for the production listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductionFilters {
	/// Campus name (`campus`).
	pub campus: Option<String>,
	/// Grand area name (`grande_area`).
	pub grand_area: Option<String>,
	/// Area name (`area`).
	pub area: Option<String>,
	/// Production types; sent as one comma-separated `tipos` parameter.
	pub types: Vec<String>,
	/// Latest year, inclusive (`ano_lte`).
	pub year_lte: Option<i32>,
	/// Earliest year, inclusive (`ano_gte`).
	pub year_gte: Option<i32>,
	/// 1-based page number.
	pub page: Option<u32>,
	/// Page size.
	pub per_page: Option<u32>,
}

impl ProductionFilters {
	/// Encode as query parameters.
	pub fn to_query(&self) -> QueryParams {
		QueryParams::new()
			.text("campus", self.campus.as_deref())
			.text("grande_area", self.grand_area.as_deref())
			.text("area", self.area.as_deref())
			.list("tipos", &self.types)
			.number("ano_lte", self.year_lte)
			.number("ano_gte", self.year_gte)
			.number("page", self.page)
			.number("per_page", self.per_page)
	}
}

/// Filters for chart statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsFilters {
	/// Campus name (`campus`).
	pub campus: Option<String>,
	/// Grand area name (`grande_area`).
	pub grand_area: Option<String>,
	/// Area name (`area`).
	pub area: Option<String>,
	/// Restrict to one person's productions (`pessoa_id`).
	pub person_id: Option<String>,
}

impl StatsFilters {
	/// Encode as query parameters.
	pub fn to_query(&self) -> QueryParams {
		QueryParams::new()
			.text("campus", self.campus.as_deref())
			.text("grande_area", self.grand_area.as_deref())
			.text("area", self.area.as_deref())
			.text("pessoa_id", self.person_id.as_deref())
	}
}
