//! Derived list views.
//!
//! [`derive_view`] turns a collection plus filter, sort and page parameters
//! into the slice a list displays. It is a pure function: no store state, no
//! I/O, and identical inputs always produce identical output.

use std::cmp::Ordering;

use parley_types::filter::Filters;
use parley_types::interview::{Interview, InterviewStatus};
use parley_types::response::Response;
use parley_types::tag::Tag;
use parley_types::view::{
    DerivedView, InterviewSortKey, PageRequest, ResponseSortKey, SortDirection, SortSpec,
};

/// An entity that can be shown in a derived list view.
pub trait Projectable: Clone {
    type SortKey: Copy + PartialEq;

    /// Fields searched by the free-text filter.
    fn search_fields(&self) -> Vec<&str>;

    /// Lifecycle status, for entities that have one.
    fn status(&self) -> Option<InterviewStatus> {
        None
    }

    fn tags(&self) -> &[Tag];

    /// Ascending comparison by `key`.
    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering;
}

/// Locale-style text ordering: case-insensitive first, raw text as the tie
/// breaker so the order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl Projectable for Interview {
    type SortKey = InterviewSortKey;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.objective.as_str()]
    }

    fn status(&self) -> Option<InterviewStatus> {
        Some(self.status)
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn compare_by(&self, other: &Self, key: InterviewSortKey) -> Ordering {
        match key {
            InterviewSortKey::Title => locale_cmp(&self.title, &other.title),
            InterviewSortKey::Status => locale_cmp(self.status.as_str(), other.status.as_str()),
            // Missing timestamps sort as the oldest possible.
            InterviewSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }
}

impl Projectable for Response {
    type SortKey = ResponseSortKey;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.summary.as_str()];
        if let Some(candidate) = &self.candidate {
            fields.push(candidate);
        }
        fields
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn compare_by(&self, other: &Self, key: ResponseSortKey) -> Ordering {
        match key {
            ResponseSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
            ResponseSortKey::Summary => locale_cmp(&self.summary, &other.summary),
        }
    }
}

/// Whether `item` passes every active filter dimension.
///
/// `search_term` must already be lowercased (see [`Filters::search_term`]).
fn passes<T: Projectable>(item: &T, filters: &Filters, search_term: Option<&str>) -> bool {
    if let Some(term) = search_term {
        let hit = item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(term));
        if !hit {
            return false;
        }
    }

    if let Some(status) = filters.status {
        if item.status() != Some(status) {
            return false;
        }
    }

    if let Some(tag_name) = &filters.tag {
        let Some(tag) = item.tags().iter().find(|tag| &tag.name == tag_name) else {
            return false;
        };
        if let Some(sentiment) = filters.effective_sentiment() {
            if tag.counts.get(sentiment) == 0 {
                return false;
            }
        }
    }

    true
}

/// Filter, sort and paginate `items`.
///
/// Pages are 1-indexed. A page past the end (or page 0, or a zero page size)
/// yields an empty slice; `total` is still the filtered count.
pub fn derive_view<T: Projectable>(
    items: &[T],
    filters: &Filters,
    sort: SortSpec<T::SortKey>,
    page: PageRequest,
) -> DerivedView<T> {
    let search_term = filters.search_term();

    let mut matched: Vec<&T> = items
        .iter()
        .filter(|item| passes(*item, filters, search_term.as_deref()))
        .collect();

    // Stable sort: equal keys keep their collection order in both directions.
    matched.sort_by(|a, b| {
        let ordering = a.compare_by(b, sort.key);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total = matched.len();
    let items = page_bounds(total, page)
        .map(|(start, end)| matched[start..end].iter().map(|item| (*item).clone()).collect())
        .unwrap_or_default();

    DerivedView { items, total, page }
}

fn page_bounds(total: usize, page: PageRequest) -> Option<(usize, usize)> {
    if page.number == 0 || page.size == 0 {
        return None;
    }
    let start = (page.number - 1).checked_mul(page.size)?;
    if start >= total {
        return None;
    }
    Some((start, start.saturating_add(page.size).min(total)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{interview, response};
    use chrono::{TimeZone, Utc};
    use parley_types::tag::{Sentiment, SentimentCounts};

    fn titles(view: &DerivedView<Interview>) -> Vec<&str> {
        view.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_filter_by_status_then_sort_by_title() {
        let items = vec![
            interview("Beta", InterviewStatus::Active),
            interview("Alpha", InterviewStatus::Draft),
        ];
        let filters = Filters {
            status: Some(InterviewStatus::Active),
            ..Default::default()
        };
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(InterviewSortKey::Title),
            PageRequest::first(10),
        );
        assert_eq!(titles(&view), vec!["Beta"]);
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_objective() {
        let mut onboarding = interview("Onboarding", InterviewStatus::Active);
        onboarding.objective = "Learn why trials CHURN".to_string();
        let items = vec![onboarding, interview("Pricing", InterviewStatus::Active)];

        let filters = Filters {
            search: "churn".to_string(),
            ..Default::default()
        };
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(InterviewSortKey::Title),
            PageRequest::first(10),
        );
        assert_eq!(titles(&view), vec!["Onboarding"]);

        let filters = Filters {
            search: "PRIC".to_string(),
            ..Default::default()
        };
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(InterviewSortKey::Title),
            PageRequest::first(10),
        );
        assert_eq!(titles(&view), vec!["Pricing"]);
    }

    #[test]
    fn test_sort_direction_and_locale_order() {
        let items = vec![
            interview("beta", InterviewStatus::Draft),
            interview("Alpha", InterviewStatus::Draft),
            interview("Charlie", InterviewStatus::Draft),
        ];
        let asc = derive_view(
            &items,
            &Filters::default(),
            SortSpec::ascending(InterviewSortKey::Title),
            PageRequest::first(10),
        );
        assert_eq!(titles(&asc), vec!["Alpha", "beta", "Charlie"]);

        let desc = derive_view(
            &items,
            &Filters::default(),
            SortSpec::ascending(InterviewSortKey::Title).toggled(InterviewSortKey::Title),
            PageRequest::first(10),
        );
        assert_eq!(titles(&desc), vec!["Charlie", "beta", "Alpha"]);
    }

    #[test]
    fn test_sort_by_created_at_is_chronological() {
        let mut old = interview("Old", InterviewStatus::Draft);
        old.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut new = interview("New", InterviewStatus::Draft);
        new.created_at = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        let mut undated = interview("Undated", InterviewStatus::Draft);
        undated.created_at = None;

        let items = vec![new, undated, old];
        let view = derive_view(
            &items,
            &Filters::default(),
            SortSpec::ascending(InterviewSortKey::CreatedAt),
            PageRequest::first(10),
        );
        assert_eq!(titles(&view), vec!["Undated", "Old", "New"]);
    }

    #[test]
    fn test_pagination_boundaries() {
        let items: Vec<Interview> = (0..12)
            .map(|n| interview(&format!("Interview {n:02}"), InterviewStatus::Draft))
            .collect();
        let sort = SortSpec::ascending(InterviewSortKey::Title);

        let page1 = derive_view(&items, &Filters::default(), sort, PageRequest::new(1, 10));
        let page2 = derive_view(&items, &Filters::default(), sort, PageRequest::new(2, 10));
        let page3 = derive_view(&items, &Filters::default(), sort, PageRequest::new(3, 10));

        assert_eq!(page1.items.len(), 10);
        assert_eq!(page2.items.len(), 2);
        assert!(page3.is_empty());
        assert_eq!(page3.total, 12);
        assert_eq!(page1.page_count(), 2);
        assert_eq!(page2.items[1].title, "Interview 11");
    }

    #[test]
    fn test_page_zero_and_zero_size_are_empty() {
        let items = vec![interview("Only", InterviewStatus::Draft)];
        let sort = SortSpec::ascending(InterviewSortKey::Title);
        assert!(derive_view(&items, &Filters::default(), sort, PageRequest::new(0, 10)).is_empty());
        assert!(derive_view(&items, &Filters::default(), sort, PageRequest::new(1, 0)).is_empty());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let items = vec![
            interview("Same", InterviewStatus::Active),
            interview("Same", InterviewStatus::Draft),
            interview("Other", InterviewStatus::Completed),
        ];
        let filters = Filters {
            search: "s".to_string(),
            ..Default::default()
        };
        let sort = SortSpec::descending(InterviewSortKey::Title);
        let first = derive_view(&items, &filters, sort, PageRequest::first(2));
        for _ in 0..5 {
            assert_eq!(derive_view(&items, &filters, sort, PageRequest::first(2)), first);
        }
    }

    #[test]
    fn test_tag_and_sentiment_filters_on_responses() {
        let happy = response(
            "Loves the dashboard",
            vec![Tag::new("ux", SentimentCounts::new(2, 0, 0))],
        );
        let grumpy = response(
            "Dashboard is slow",
            vec![Tag::new("ux", SentimentCounts::new(0, 1, 0))],
        );
        let unrelated = response("Pricing is fine", vec![]);
        let items = vec![happy, grumpy, unrelated];

        let mut filters = Filters::default();
        filters.select_tag(Some("ux".to_string()), None);
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(ResponseSortKey::Summary),
            PageRequest::first(10),
        );
        assert_eq!(view.total, 2);

        filters.select_sentiment(Some(Sentiment::Negative)).unwrap();
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(ResponseSortKey::Summary),
            PageRequest::first(10),
        );
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].summary, "Dashboard is slow");
    }

    #[test]
    fn test_sentiment_without_tag_is_ignored() {
        let items = vec![response("No tags here", vec![])];
        let filters = Filters {
            sentiment: Some(Sentiment::Negative),
            ..Default::default()
        };
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(ResponseSortKey::Summary),
            PageRequest::first(10),
        );
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_status_filter_excludes_statusless_entities() {
        let items = vec![response("Any", vec![])];
        let filters = Filters {
            status: Some(InterviewStatus::Active),
            ..Default::default()
        };
        let view = derive_view(
            &items,
            &filters,
            SortSpec::ascending(ResponseSortKey::Summary),
            PageRequest::first(10),
        );
        assert!(view.is_empty());
    }
}
