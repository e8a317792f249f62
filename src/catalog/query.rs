//! Turns raw caller parameters into a validated store request.

use super::error::{CatalogError, CatalogResult};
use crate::catalog_store::{PageRequest, SongFilter, SongSort, SortDirection, SortField};

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Sort alias kept for existing clients.
const RELEASE_DATE_ALIAS: &str = "releasedate";

/// Paging limits applied to every catalog request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Raw search parameters. Absent values take the defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SongQuery {
    /// 1-based.
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub release_year: Option<String>,
    pub min_popularity: Option<i64>,
}

/// A validated request, ready for the store.
#[derive(Clone, Debug, PartialEq)]
pub struct SongSearch {
    pub page_request: PageRequest,
    pub sort: SongSort,
    pub filter: SongFilter,
}

impl SongQuery {
    pub fn build(&self, settings: &CatalogSettings) -> CatalogResult<SongSearch> {
        let page_request = build_page_request(self.page, self.size, settings)?;

        let field = match &self.sort_by {
            Some(name) => parse_sort_field(name)?,
            None => SortField::Popularity,
        };
        let direction = match &self.sort_direction {
            Some(direction) => parse_direction(direction),
            None => SortDirection::Descending,
        };

        let min_popularity = self.min_popularity.unwrap_or(0);
        if min_popularity < 0 {
            return Err(CatalogError::InvalidQuery(format!(
                "Minimum popularity must not be negative, got {}",
                min_popularity
            )));
        }

        let filter = SongFilter {
            track_name: normalize_text(&self.track_name),
            track_name_prefix: String::new(),
            artist_name: normalize_text(&self.artist_name),
            album_name: normalize_text(&self.album_name),
            release_date_prefix: normalize_text(&self.release_year),
            min_popularity: i32::try_from(min_popularity).unwrap_or(i32::MAX),
        };

        Ok(SongSearch {
            page_request,
            sort: SongSort { field, direction },
            filter,
        })
    }
}

/// Translates a 1-based page number and a page size into a store request.
pub fn build_page_request(
    page: Option<i64>,
    size: Option<i64>,
    settings: &CatalogSettings,
) -> CatalogResult<PageRequest> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(CatalogError::InvalidQuery(format!(
            "Page must be at least 1, got {}",
            page
        )));
    }

    let size = size.unwrap_or(settings.default_page_size as i64);
    if size < 1 {
        return Err(CatalogError::InvalidQuery(format!(
            "Page size must be at least 1, got {}",
            size
        )));
    }
    if size as u64 > settings.max_page_size as u64 {
        return Err(CatalogError::InvalidQuery(format!(
            "Page size must be at most {}, got {}",
            settings.max_page_size, size
        )));
    }

    let request = usize::try_from(page - 1)
        .ok()
        .zip(usize::try_from(size).ok())
        .map(|(page_index, page_size)| PageRequest {
            page_index,
            page_size,
        })
        .filter(|request| request.offset().is_some());
    request.ok_or_else(|| {
        CatalogError::InvalidQuery(format!(
            "Page {} is out of range for page size {}",
            page, size
        ))
    })
}

/// Resolves a caller-facing sort name. Matching ignores case and underscores,
/// so `trackName`, `TRACKNAME` and `track_name` are the same field.
pub fn parse_sort_field(name: &str) -> CatalogResult<SortField> {
    let normalized: String = name
        .trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    if normalized == RELEASE_DATE_ALIAS {
        return Ok(SortField::AlbumReleaseDate);
    }

    SortField::ALL
        .iter()
        .copied()
        .find(|field| field.attribute_name().to_lowercase() == normalized)
        .ok_or_else(|| CatalogError::InvalidQuery(format!("Unknown sort field '{}'", name)))
}

/// `DESC` in any case is descending, anything else ascending.
pub fn parse_direction(direction: &str) -> SortDirection {
    if direction.trim().eq_ignore_ascii_case("desc") {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

fn normalize_text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
