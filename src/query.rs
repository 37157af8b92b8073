//! List query specification: limit, page/offset, sort and populate, parsed from query params.

use crate::config::ListDefaults;
use crate::error::AppError;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Keyword handed to the store's ORDER BY.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("sort must be 'asc' or 'desc', got '{}'", s))
        }
    }
}

/// Which relations to eager-load alongside each student.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Populate {
    None,
    Courses,
}

impl Populate {
    /// `courses` selects the relation; anything else loads bare rows.
    pub fn parse(s: &str) -> Self {
        if s == "courses" {
            Populate::Courses
        } else {
            Populate::None
        }
    }

    pub fn courses(self) -> bool {
        matches!(self, Populate::Courses)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSpec {
    pub limit: u32,
    pub page: u32,
    pub offset: u64,
    pub sort: SortOrder,
    pub populate: Populate,
}

impl ListSpec {
    pub fn new(limit: u32, page: u32, sort: SortOrder, populate: Populate) -> Self {
        let offset = u64::from(page.saturating_sub(1)) * u64::from(limit);
        ListSpec {
            limit,
            page,
            offset,
            sort,
            populate,
        }
    }

    /// Resolve query params against defaults. Unknown params are ignored.
    pub fn from_params(
        params: &HashMap<String, String>,
        defaults: &ListDefaults,
    ) -> Result<Self, AppError> {
        let limit = match params.get("limit") {
            Some(v) => parse_positive("limit", v)?.min(defaults.max_limit),
            None => defaults.limit,
        };
        let page = match params.get("page") {
            Some(v) => parse_positive("page", v)?,
            None => defaults.page,
        };
        let sort = match params.get("sort") {
            Some(v) => v.parse().map_err(AppError::BadRequest)?,
            None => defaults.sort,
        };
        let populate = params
            .get("populate")
            .map(|v| Populate::parse(v))
            .unwrap_or(Populate::None);
        Ok(ListSpec::new(limit, page, sort, populate))
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u32, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
        Ok(_) => Err(AppError::BadRequest(format!("{} must be at least 1", name))),
        Err(_) => Err(AppError::BadRequest(format!("{} must be an integer", name))),
    }
}
