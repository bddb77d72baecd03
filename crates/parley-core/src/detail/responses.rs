//! Response listing detail: an interview and the responses collected for it.

use tracing::debug;

use parley_types::error::{ServiceError, StoreError};
use parley_types::filter::Filters;
use parley_types::interview::{Interview, InterviewId};
use parley_types::response::{Response, ResponseId};
use parley_types::tag::{Sentiment, aggregate_counts};
use parley_types::view::{DerivedView, PageRequest, ResponseSortKey, SortSpec};

use super::{DetailKind, DetailStore};
use crate::chat::{ChatSession, Replay};
use crate::service::InterviewService;
use crate::view::derive_view;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseListingDetail;

/// Filter state and the response whose transcript is open.
#[derive(Debug, Clone, Default)]
pub struct ListingLocal {
    pub filters: Filters,
    pub selected: Option<ResponseId>,
}

impl DetailKind for ResponseListingDetail {
    type Id = InterviewId;
    type Focal = Interview;
    type Dependents = Vec<Response>;
    type Local = ListingLocal;
    type Mode = Replay;

    const LABEL: &'static str = "responses";

    async fn fetch_focal<R: InterviewService>(
        remote: &R,
        id: &InterviewId,
    ) -> Result<Interview, ServiceError> {
        remote.get_interview(id).await
    }

    async fn fetch_dependents<R: InterviewService>(
        remote: &R,
        focal: &Interview,
    ) -> Result<Vec<Response>, ServiceError> {
        remote.list_responses(&focal.id).await
    }

    /// Replays open per selected response, not with the listing.
    fn session_mode(_id: &InterviewId) -> Option<Replay> {
        None
    }
}

impl<R: InterviewService> DetailStore<R, ResponseListingDetail> {
    /// Select (or clear) the tag filter. The sentiment filter defaults to the
    /// tag's dominant sentiment across the loaded responses.
    pub async fn select_tag_filter(&self, tag: Option<String>) {
        let mut state = self.state.write().await;
        let snapshot = &mut state.snapshot;
        let counts = tag.as_deref().and_then(|name| {
            aggregate_counts(snapshot.dependents.iter().map(|r| r.tags.as_slice()), name)
        });
        snapshot.local.filters.select_tag(tag, counts);
    }

    /// Override the sentiment filter. Only valid while a tag is selected.
    pub async fn select_sentiment_filter(
        &self,
        sentiment: Option<Sentiment>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.snapshot.local.filters.select_sentiment(sentiment)
    }

    pub async fn set_search_filter(&self, search: impl Into<String>) {
        let mut state = self.state.write().await;
        state.snapshot.local.filters.search = search.into();
    }

    /// The given page of filtered responses, in `sort` order.
    pub async fn responses_view(
        &self,
        sort: SortSpec<ResponseSortKey>,
        page: usize,
    ) -> DerivedView<Response> {
        let state = self.state.read().await;
        derive_view(
            &state.snapshot.dependents,
            &state.snapshot.local.filters,
            sort,
            PageRequest::new(page, self.config.page_size),
        )
    }

    /// Open the read-only transcript of one of this interview's responses.
    ///
    /// Re-opening the selected response reuses its session, which never
    /// refetches.
    pub async fn open_response(
        &self,
        response_id: ResponseId,
    ) -> Result<ChatSession<R, Replay>, StoreError> {
        let session = {
            let mut state = self.state.write().await;
            if !state.snapshot.dependents.iter().any(|r| r.id == response_id) {
                return Err(StoreError::UnknownResponse);
            }
            let reuse = state.snapshot.local.selected == Some(response_id);
            match state.session.clone() {
                Some(session) if reuse => session,
                _ => {
                    let session = self.open_session(Replay { response_id });
                    state.session = Some(session.clone());
                    state.snapshot.local.selected = Some(response_id);
                    session
                }
            }
        };

        debug!(response_id = %response_id, "Opening response replay");
        session.load().await.map_err(StoreError::Dependents)?;
        Ok(session)
    }

    pub async fn close_response(&self) {
        let mut state = self.state.write().await;
        state.session = None;
        state.snapshot.local.selected = None;
    }

    pub async fn selected_response(&self) -> Option<Response> {
        let state = self.state.read().await;
        let selected = state.snapshot.local.selected?;
        state
            .snapshot
            .dependents
            .iter()
            .find(|r| r.id == selected)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chat::{RejectReason, SendOutcome};
    use crate::store::{InitOutcome, LoadState};
    use crate::test_support::{MockService, Op, interview, response};
    use parley_types::config::ClientConfig;
    use parley_types::error::ErrorKind;
    use parley_types::interview::InterviewStatus;
    use parley_types::message::{Message, SessionTarget};
    use parley_types::tag::{SentimentCounts, Tag};

    fn store(service: &Arc<MockService>) -> DetailStore<MockService, ResponseListingDetail> {
        DetailStore::new(Arc::clone(service), Arc::new(ClientConfig::default()))
    }

    fn tagged(summary: &str, interview_id: InterviewId, counts: SentimentCounts) -> Response {
        let mut r = response(summary, vec![Tag::new("pricing", counts)]);
        r.interview_id = interview_id;
        r
    }

    fn seeded() -> (Arc<MockService>, Interview) {
        let alpha = interview("Alpha", InterviewStatus::Active);
        let service = MockService::with_interviews(vec![alpha.clone()]);
        service.add_response(tagged("Too expensive", alpha.id, SentimentCounts::new(0, 2, 0)));
        service.add_response(tagged("Fair price", alpha.id, SentimentCounts::new(2, 0, 1)));
        // Belongs to another interview; must not show up.
        service.add_response(response("Elsewhere", vec![]));
        (Arc::new(service), alpha)
    }

    #[tokio::test]
    async fn test_init_loads_only_this_interviews_responses() {
        let (service, alpha) = seeded();
        let store = store(&service);

        assert_eq!(store.init_for(alpha.id).await.unwrap(), InitOutcome::Loaded);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.dependents.len(), 2);
        assert!(store.session().await.is_none());
    }

    #[tokio::test]
    async fn test_dependents_failure_keeps_focal() {
        let (service, alpha) = seeded();
        service.fail(Op::ListResponses);
        let store = store(&service);

        assert_eq!(store.init_for(alpha.id).await.unwrap(), InitOutcome::Partial);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.focal.unwrap().id, alpha.id);
        assert_eq!(snapshot.load_state, LoadState::Ready);
        assert_eq!(snapshot.dependents_state, LoadState::Errored);
        assert!(snapshot.errors.dependents);
        assert!(!snapshot.errors.initialization);

        service.recover(Op::ListResponses);
        assert!(matches!(
            store.fetch_dependents().await,
            Err(StoreError::UnclearedError(ErrorKind::Dependents))
        ));
        store.clear_error(ErrorKind::Dependents).await;
        store.fetch_dependents().await.unwrap();
        assert_eq!(store.snapshot().await.dependents.len(), 2);
    }

    #[tokio::test]
    async fn test_tag_filter_defaults_to_dominant_sentiment() {
        let alpha = interview("Alpha", InterviewStatus::Active);
        let service = MockService::with_interviews(vec![alpha.clone()]);
        service.add_response(tagged("a", alpha.id, SentimentCounts::new(1, 2, 0)));
        service.add_response(tagged("b", alpha.id, SentimentCounts::new(1, 0, 1)));
        let service = Arc::new(service);
        let store = store(&service);
        store.init_for(alpha.id).await.unwrap();

        // Aggregate {positive 2, negative 2, neutral 1}.
        store.select_tag_filter(Some("pricing".to_string())).await;
        let filters = store.snapshot().await.local.filters;
        assert_eq!(filters.sentiment, Some(Sentiment::Positive));
    }

    #[tokio::test]
    async fn test_sentiment_filter_narrows_view() {
        let (service, alpha) = seeded();
        let store = store(&service);
        store.init_for(alpha.id).await.unwrap();

        store.select_tag_filter(Some("pricing".to_string())).await;
        store
            .select_sentiment_filter(Some(Sentiment::Negative))
            .await
            .unwrap();
        let view = store
            .responses_view(SortSpec::ascending(ResponseSortKey::Summary), 1)
            .await;
        assert_eq!(view.total, 1);
        assert_eq!(view.items[0].summary, "Too expensive");

        store.select_tag_filter(None).await;
        assert!(matches!(
            store.select_sentiment_filter(Some(Sentiment::Neutral)).await,
            Err(StoreError::SentimentWithoutTag)
        ));
        let view = store
            .responses_view(SortSpec::ascending(ResponseSortKey::Summary), 1)
            .await;
        let summaries: Vec<_> = view.items.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Fair price", "Too expensive"]);
    }

    #[tokio::test]
    async fn test_open_response_replays_read_only() {
        let (service, alpha) = seeded();
        let store = store(&service);
        store.init_for(alpha.id).await.unwrap();
        let target = store.snapshot().await.dependents[0].id;
        service.set_transcript(
            SessionTarget::Response(target),
            vec![Message::agent("Hi!"), Message::human("Hello")],
        );

        let session = store.open_response(target).await.unwrap();
        assert_eq!(session.messages().await.len(), 2);
        assert_eq!(
            session.send("more").await,
            SendOutcome::Rejected(RejectReason::ReadOnly)
        );

        store.open_response(target).await.unwrap();
        assert_eq!(service.calls(Op::GetTranscript), 1);
        assert_eq!(store.selected_response().await.unwrap().id, target);

        store.close_response().await;
        assert!(store.selected_response().await.is_none());
        assert!(store.session().await.is_none());
    }

    #[tokio::test]
    async fn test_open_unknown_response_is_rejected() {
        let (service, alpha) = seeded();
        let store = store(&service);
        store.init_for(alpha.id).await.unwrap();

        assert!(matches!(
            store.open_response(ResponseId::new()).await,
            Err(StoreError::UnknownResponse)
        ));
        assert_eq!(service.calls(Op::GetTranscript), 0);
    }

    #[tokio::test]
    async fn test_retarget_clears_filters_and_selection() {
        let (service, alpha) = seeded();
        let beta = interview("Beta", InterviewStatus::Draft);
        service.interviews.lock().unwrap().push(beta.clone());
        let store = store(&service);

        store.init_for(alpha.id).await.unwrap();
        store.select_tag_filter(Some("pricing".to_string())).await;
        let first = store.snapshot().await.dependents[0].id;
        store.open_response(first).await.unwrap();

        store.init_for(beta.id).await.unwrap();
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.focal.unwrap().id, beta.id);
        assert!(snapshot.dependents.is_empty());
        assert!(snapshot.local.filters.tag.is_none());
        assert!(snapshot.local.selected.is_none());
        assert!(store.session().await.is_none());
    }

    #[tokio::test]
    async fn test_replay_failure_does_not_flag_listing() {
        let (service, alpha) = seeded();
        let store = store(&service);
        store.init_for(alpha.id).await.unwrap();
        let first = store.snapshot().await.dependents[0].id;

        service.fail(Op::GetTranscript);
        let err = store.open_response(first).await.unwrap_err();
        assert!(matches!(err, StoreError::Dependents(_)));

        let snapshot = store.snapshot().await;
        assert!(!snapshot.errors.any());
        assert_eq!(snapshot.dependents_state, LoadState::Ready);
        // The listing's own refetch is not blocked by the replay failure.
        service.recover(Op::GetTranscript);
        assert!(store.fetch_dependents().await.is_ok());
    }
}
