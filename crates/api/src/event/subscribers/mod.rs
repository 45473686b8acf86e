use super::run_matching::{MatchingOutcome, RunMatchingUseCase};
use crate::shared::usecase::Subscriber;
use gifting_infra::GiftingContext;

pub struct DispatchNotificationsOnEventMatched;

#[async_trait::async_trait(?Send)]
impl Subscriber<RunMatchingUseCase> for DispatchNotificationsOnEventMatched {
    async fn notify(&self, e: &MatchingOutcome, ctx: &GiftingContext) {
        if let MatchingOutcome::Matched {
            event_id,
            assignments,
        } = e
        {
            // Delivery happens in the background, the matching is already committed
            ctx.notifications.submit(event_id, assignments.clone());
        }
    }
}
