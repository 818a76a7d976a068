//! Lunchbox session: the selection flow and the weekly plan
//!
//! A [`LunchboxSession`] owns all mutable state of one user session. The
//! selection flow walks the four categories in order:
//!
//! ```text
//! Choosing(Bund) -> Choosing(Protein) -> Choosing(Grønt) -> Choosing(Ekstra)
//!     -> Finalizing -> Finalized
//! ```
//!
//! Finalizing fires the advice and image requests together and waits for
//! both. Any state can be reset back to `Choosing(Bund)`.

mod error;
pub mod planner;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

pub use error::SessionError;

use crate::advice::Advisor;
use crate::domain::{Category, FoodItem, Price, SavedLunchbox, Selection, Weekday, WeeklyPlan, catalog};
use crate::genai::ChatMessage;
use crate::illustrator::Illustrator;

/// Where the selection flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Waiting for an item of this category
    Choosing(Category),
    /// All four chosen; advice and image requests in flight
    Finalizing,
    /// Advice and image are in; chat is open
    Finalized,
}

impl FlowStep {
    /// The starting step
    pub const START: FlowStep = FlowStep::Choosing(Category::Base);
}

/// All state of one lunchbox-building session
pub struct LunchboxSession {
    advisor: Advisor,
    illustrator: Illustrator,
    rng: Box<dyn RngCore + Send>,
    step: FlowStep,
    selection: Selection,
    transcript: Vec<ChatMessage>,
    image: Option<String>,
    plan: WeeklyPlan,
    detail: Option<Weekday>,
}

impl LunchboxSession {
    /// Create a session with an OS-seeded random source
    pub fn new(advisor: Advisor, illustrator: Illustrator) -> Self {
        debug!("LunchboxSession::new: called");
        Self {
            advisor,
            illustrator,
            rng: Box::new(StdRng::from_os_rng()),
            step: FlowStep::START,
            selection: Selection::new(),
            transcript: Vec::new(),
            image: None,
            plan: WeeklyPlan::new(),
            detail: None,
        }
    }

    /// Replace the random source used by bulk generation
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Illustration of the finalized lunchbox, if one was generated
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn plan(&self) -> &WeeklyPlan {
        &self.plan
    }

    /// Category being chosen, if the flow is still choosing
    pub fn current_category(&self) -> Option<Category> {
        match self.step {
            FlowStep::Choosing(category) => Some(category),
            _ => None,
        }
    }

    /// Items offered at the current step
    pub fn choices(&self) -> Vec<&'static FoodItem> {
        self.current_category().map(catalog::items_in).unwrap_or_default()
    }

    /// Price of the lunchbox being built
    pub fn current_total(&self) -> Price {
        self.selection.total_price()
    }

    /// Choose an item for the current category
    ///
    /// Choosing the last category finalizes the lunchbox before returning.
    pub async fn choose(&mut self, item: &'static FoodItem) -> Result<FlowStep, SessionError> {
        debug!(id = %item.id, step = ?self.step, "LunchboxSession::choose: called");
        let FlowStep::Choosing(expected) = self.step else {
            return Err(SessionError::NotChoosing);
        };
        if item.category != expected {
            return Err(SessionError::WrongCategory {
                expected,
                got: item.category,
            });
        }

        self.selection.set(item);
        match expected.next() {
            Some(next) => {
                self.step = FlowStep::Choosing(next);
            }
            None => {
                self.step = FlowStep::Finalizing;
                self.finalize().await;
            }
        }
        Ok(self.step)
    }

    /// Choose an item by catalog id
    pub async fn choose_id(&mut self, id: &str) -> Result<FlowStep, SessionError> {
        let item = catalog::find(id).ok_or_else(|| SessionError::UnknownItem(id.to_string()))?;
        self.choose(item).await
    }

    /// Fetch advice and illustration together, then apply both at once
    async fn finalize(&mut self) {
        let snapshot = self.selection;
        info!(total = %snapshot.total_price(), "LunchboxSession::finalize: lunchbox complete");

        let (advice, image) = tokio::join!(
            self.advisor.advise(&[], &snapshot),
            self.illustrator.illustrate(&snapshot)
        );

        self.transcript = vec![ChatMessage::model(advice)];
        self.image = image;
        self.step = FlowStep::Finalized;
        debug!(has_image = self.image.is_some(), "LunchboxSession::finalize: finalized");
    }

    /// Send a chat message about the finalized lunchbox and return the reply
    pub async fn send_message(&mut self, text: &str) -> Result<String, SessionError> {
        debug!(step = ?self.step, "LunchboxSession::send_message: called");
        if self.step != FlowStep::Finalized {
            return Err(SessionError::NotFinalized);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.transcript.push(ChatMessage::user(text));
        let reply = self.advisor.advise(&self.transcript, &self.selection).await;
        self.transcript.push(ChatMessage::model(reply.clone()));
        Ok(reply)
    }

    /// Back to the first category with nothing chosen
    pub fn reset(&mut self) {
        debug!(step = ?self.step, "LunchboxSession::reset: called");
        self.step = FlowStep::START;
        self.selection = Selection::new();
        self.transcript.clear();
        self.image = None;
    }

    /// Store a lunchbox on a day, overwriting it, and restart the flow
    pub fn save(&mut self, day: Weekday, selection: Selection, image: Option<String>) {
        info!(%day, "LunchboxSession::save: saving lunchbox");
        self.plan.save(day, SavedLunchbox::new(selection, image));
        self.reset();
    }

    /// Save the finalized lunchbox on a day
    pub fn save_current(&mut self, day: Weekday) -> Result<(), SessionError> {
        if self.step != FlowStep::Finalized {
            return Err(SessionError::NotFinalized);
        }
        let image = self.image.take();
        self.save(day, self.selection, image);
        Ok(())
    }

    /// Clear a day; closes its detail view if open
    pub fn remove(&mut self, day: Weekday) -> Option<SavedLunchbox> {
        debug!(%day, "LunchboxSession::remove: called");
        if self.detail == Some(day) {
            self.detail = None;
        }
        self.plan.remove(day)
    }

    /// Open the detail view of a planned day
    pub fn open_detail(&mut self, day: Weekday) -> Option<&SavedLunchbox> {
        debug!(%day, "LunchboxSession::open_detail: called");
        if self.plan.get(day).is_some() {
            self.detail = Some(day);
        }
        self.plan.get(day)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// The open detail view, if any
    pub fn detail(&self) -> Option<(Weekday, &SavedLunchbox)> {
        self.detail.and_then(|day| self.plan.get(day).map(|lunchbox| (day, lunchbox)))
    }

    /// Fill the whole week with random illustrated lunchboxes
    ///
    /// The plan is replaced in one step once all five illustrations settled.
    pub async fn bulk_generate(&mut self) {
        info!("LunchboxSession::bulk_generate: generating week");
        let selections = planner::random_week(&mut *self.rng);
        let week = planner::illustrate_week(&self.illustrator, selections).await;
        self.plan = WeeklyPlan::from_days(week);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::{AdviceConfig, ImageConfig};
    use crate::genai::Role;
    use crate::genai::client::mock::{MockGenAiClient, png};
    use crate::prompts::PromptLoader;

    fn session(client: Arc<MockGenAiClient>) -> LunchboxSession {
        let prompts = Arc::new(PromptLoader::embedded_only());
        let advisor = Advisor::new(client.clone(), prompts.clone(), AdviceConfig::default());
        let illustrator = Illustrator::new(client, prompts, ImageConfig::default());
        LunchboxSession::new(advisor, illustrator).with_rng(StdRng::seed_from_u64(3))
    }

    async fn build(session: &mut LunchboxSession) -> FlowStep {
        let mut step = session.step();
        for id in ["rugbrod", "frikadeller", "gulerod", "aeblebaade"] {
            step = session.choose_id(id).await.unwrap();
        }
        step
    }

    #[tokio::test]
    async fn test_four_picks_reach_finalized() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("BAM! Rugbrød giver super-energi!".to_string()))])
                .with_images(vec![Ok(Some(png("QUJD")))]),
        );
        let mut session = session(client.clone());

        assert_eq!(session.step(), FlowStep::Choosing(Category::Base));
        assert_eq!(
            session.choose_id("rugbrod").await.unwrap(),
            FlowStep::Choosing(Category::Protein)
        );
        assert_eq!(
            session.choose_id("frikadeller").await.unwrap(),
            FlowStep::Choosing(Category::Green)
        );
        assert_eq!(
            session.choose_id("gulerod").await.unwrap(),
            FlowStep::Choosing(Category::Extra)
        );
        assert_eq!(session.choose_id("aeblebaade").await.unwrap(), FlowStep::Finalized);

        assert!(session.selection().is_complete());
        assert_eq!(session.transcript(), &[ChatMessage::model("BAM! Rugbrød giver super-energi!")]);
        assert_eq!(session.image(), Some("data:image/png;base64,QUJD"));
        // 3.00 + 8.50 + 1.50 + 2.00
        assert_eq!(session.current_total(), Price::new(15, 0));

        // Both requests saw the complete selection
        let text_requests = client.text_requests();
        let text_request = &text_requests[0];
        assert!(text_request.system_instruction.contains("Ekstra: Æblebåde"));
        assert!(client.image_requests()[0].prompt.contains("Æblebåde"));
    }

    #[tokio::test]
    async fn test_finalize_issues_both_requests_before_awaiting() {
        // The barrier only opens once both requests are in flight together
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("WOW!".to_string()))])
                .with_images(vec![Ok(Some(png("QUJD")))])
                .with_barrier(2),
        );
        let mut session = session(client.clone());

        let step = tokio::time::timeout(Duration::from_secs(5), build(&mut session))
            .await
            .expect("finalize should not wait on one request before issuing the other");
        assert_eq!(step, FlowStep::Finalized);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_finalize_with_failing_services() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Err("down".to_string())])
                .with_images(vec![Err("down".to_string())]),
        );
        let mut session = session(client);

        assert_eq!(build(&mut session).await, FlowStep::Finalized);
        assert_eq!(session.transcript()[0].text, crate::advice::ERROR_FALLBACK);
        assert!(session.image().is_none());
    }

    #[tokio::test]
    async fn test_wrong_category_is_rejected() {
        let mut session = session(Arc::new(MockGenAiClient::new()));

        let err = session.choose_id("aeg").await.unwrap_err();
        assert_eq!(
            err,
            SessionError::WrongCategory {
                expected: Category::Base,
                got: Category::Protein,
            }
        );
        assert_eq!(session.step(), FlowStep::START);
        assert!(session.selection().is_empty());

        assert_eq!(
            session.choose_id("pizza").await.unwrap_err(),
            SessionError::UnknownItem("pizza".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_back_navigation() {
        let mut session = session(Arc::new(MockGenAiClient::new()));
        session.choose_id("grovbolle").await.unwrap();

        // Another base is not accepted once the base is chosen
        assert!(matches!(
            session.choose_id("rugbrod").await,
            Err(SessionError::WrongCategory { .. })
        ));
        assert_eq!(session.selection().get(Category::Base).unwrap().id, "grovbolle");
    }

    #[tokio::test]
    async fn test_choosing_after_finalized_is_rejected() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("BAM!".to_string()))])
                .with_images(vec![Ok(None)]),
        );
        let mut session = session(client);
        build(&mut session).await;

        assert_eq!(session.choose_id("rugbrod").await.unwrap_err(), SessionError::NotChoosing);
    }

    #[tokio::test]
    async fn test_reset_from_every_state() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("BAM!".to_string())), Ok(Some("SLURP!".to_string()))])
                .with_images(vec![Ok(Some(png("QUJD")))]),
        );
        let mut session = session(client);

        // Fresh
        session.reset();
        assert_eq!(session.step(), FlowStep::START);

        // Mid-flow
        session.choose_id("rugbrod").await.unwrap();
        session.choose_id("aeg").await.unwrap();
        session.reset();
        assert_eq!(session.step(), FlowStep::START);
        assert!(session.selection().is_empty());

        // Finalized with a conversation
        build(&mut session).await;
        session.send_message("Hej").await.unwrap();
        session.reset();
        assert_eq!(session.step(), FlowStep::START);
        assert!(session.selection().is_empty());
        assert!(session.transcript().is_empty());
        assert!(session.image().is_none());
    }

    #[tokio::test]
    async fn test_second_turn_sends_full_transcript() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![
                    Ok(Some("BAM!".to_string())),
                    Ok(Some("SLURP! Gulerødder giver falkeblik.".to_string())),
                    Ok(Some("WOW!".to_string())),
                ])
                .with_images(vec![Ok(None)]),
        );
        let mut session = session(client.clone());
        build(&mut session).await;

        let first = session.send_message("Hvorfor gulerødder?").await.unwrap();
        assert_eq!(first, "SLURP! Gulerødder giver falkeblik.");
        session.send_message("  Og æbler?  ").await.unwrap();

        let requests = client.text_requests();
        assert_eq!(requests.len(), 3);
        let second_turn = &requests[2].contents;
        assert_eq!(
            second_turn,
            &vec![
                ChatMessage::model("BAM!"),
                ChatMessage::user("Hvorfor gulerødder?"),
                ChatMessage::model("SLURP! Gulerødder giver falkeblik."),
                ChatMessage::user("Og æbler?"),
            ]
        );
        assert_eq!(session.transcript().len(), 5);
        assert_eq!(session.transcript()[4].role, Role::Model);

        // Category selections are untouched by chatting
        assert_eq!(session.selection().get(Category::Green).unwrap().id, "gulerod");
    }

    #[tokio::test]
    async fn test_send_message_requires_finalized_and_text() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("BAM!".to_string()))])
                .with_images(vec![Ok(None)]),
        );
        let mut session = session(client.clone());

        assert_eq!(session.send_message("Hej").await.unwrap_err(), SessionError::NotFinalized);

        build(&mut session).await;
        assert_eq!(session.send_message("   ").await.unwrap_err(), SessionError::EmptyMessage);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(client.text_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_save_current_resets_flow() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_texts(vec![Ok(Some("BAM!".to_string()))])
                .with_images(vec![Ok(Some(png("QUJD")))]),
        );
        let mut session = session(client);

        assert_eq!(session.save_current(Weekday::Mandag).unwrap_err(), SessionError::NotFinalized);

        build(&mut session).await;
        let built = *session.selection();
        session.save_current(Weekday::Tirsdag).unwrap();

        let saved = session.plan().get(Weekday::Tirsdag).unwrap();
        assert_eq!(saved.selection, built);
        assert_eq!(saved.image.as_deref(), Some("data:image/png;base64,QUJD"));
        assert_eq!(session.step(), FlowStep::START);
        assert!(session.selection().is_empty());
        assert!(session.transcript().is_empty());
        assert!(session.image().is_none());
    }

    #[tokio::test]
    async fn test_save_then_remove_is_idempotent() {
        let mut session = session(Arc::new(MockGenAiClient::new()));
        let selection = Selection::from_items([catalog::find("pastasalat").unwrap()]);

        session.save(Weekday::Fredag, selection, None);
        assert!(session.plan().get(Weekday::Fredag).is_some());

        assert!(session.remove(Weekday::Fredag).is_some());
        assert!(session.plan().get(Weekday::Fredag).is_none());
        assert!(session.remove(Weekday::Fredag).is_none());
        assert_eq!(session.plan(), &WeeklyPlan::new());
    }

    #[tokio::test]
    async fn test_remove_closes_matching_detail_view() {
        let mut session = session(Arc::new(MockGenAiClient::new()));
        let selection = Selection::from_items([catalog::find("grovbolle").unwrap()]);
        session.save(Weekday::Mandag, selection, None);
        session.save(Weekday::Onsdag, selection, None);

        // Nothing planned on Tuesday: no detail view
        assert!(session.open_detail(Weekday::Tirsdag).is_none());
        assert!(session.detail().is_none());

        assert!(session.open_detail(Weekday::Mandag).is_some());
        session.remove(Weekday::Onsdag);
        assert_eq!(session.detail().map(|(day, _)| day), Some(Weekday::Mandag));

        session.remove(Weekday::Mandag);
        assert!(session.detail().is_none());

        session.open_detail(Weekday::Mandag);
        assert!(session.detail().is_none());
    }

    #[tokio::test]
    async fn test_bulk_generate_fills_every_day_even_when_images_fail() {
        let client = Arc::new(MockGenAiClient::new().with_images(vec![
            Ok(Some(png("MON"))),
            Err("quota".to_string()),
            Ok(None),
            Ok(Some(png("THU"))),
            Err("quota".to_string()),
        ]));
        let mut session = session(client.clone());

        session.bulk_generate().await;

        let plan = session.plan();
        assert_eq!(plan.planned_count(), 5);
        for (day, slot) in plan.days() {
            let slot = slot.unwrap_or_else(|| panic!("{day} is empty"));
            assert!(slot.selection.is_complete(), "{day} is incomplete");
        }
        assert_eq!(
            plan.get(Weekday::Mandag).unwrap().image.as_deref(),
            Some("data:image/png;base64,MON")
        );
        assert!(plan.get(Weekday::Tirsdag).unwrap().image.is_none());
        assert!(plan.get(Weekday::Onsdag).unwrap().image.is_none());
        assert_eq!(
            plan.get(Weekday::Torsdag).unwrap().image.as_deref(),
            Some("data:image/png;base64,THU")
        );
        assert!(plan.get(Weekday::Fredag).unwrap().image.is_none());

        // Only images, never advice
        assert_eq!(client.image_requests().len(), 5);
        assert!(client.text_requests().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_generate_issues_all_five_requests_before_awaiting() {
        let client = Arc::new(
            MockGenAiClient::new()
                .with_images((0..5).map(|_| Ok(Some(png("QUJD")))).collect())
                .with_barrier(5),
        );
        let mut session = session(client.clone());

        tokio::time::timeout(Duration::from_secs(5), session.bulk_generate())
            .await
            .expect("all five image requests should be in flight together");
        assert_eq!(session.plan().planned_count(), 5);
        assert_eq!(client.call_count(), 5);
    }

    #[tokio::test]
    async fn test_bulk_generate_overwrites_saved_days() {
        let client = Arc::new(MockGenAiClient::new().with_images(vec![]));
        let mut session = session(client);
        let saved = Selection::from_items([catalog::find("rugbrod").unwrap()]);
        session.save(Weekday::Mandag, saved, Some("data:image/png;base64,OLD".to_string()));

        session.bulk_generate().await;

        let monday = session.plan().get(Weekday::Mandag).unwrap();
        assert!(monday.selection.is_complete());
        assert!(monday.image.is_none());
    }

    #[tokio::test]
    async fn test_bulk_generate_is_reproducible_with_seeded_rng() {
        let mut a = session(Arc::new(MockGenAiClient::new()));
        let mut b = session(Arc::new(MockGenAiClient::new()));
        a.bulk_generate().await;
        b.bulk_generate().await;
        assert_eq!(a.plan(), b.plan());
    }

    #[tokio::test]
    async fn test_choices_follow_the_flow() {
        let mut session = session(Arc::new(MockGenAiClient::new()));
        assert!(session.choices().iter().all(|i| i.category == Category::Base));
        assert_eq!(session.choices().len(), 4);
        session.choose_id("rugbrod").await.unwrap();
        assert!(session.choices().iter().all(|i| i.category == Category::Protein));
    }
}
