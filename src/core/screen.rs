use crate::core::catalog::{QuickReading, QuickReadingSource, ScreenSpec, TopicField, DEFAULT_PERIOD};
use crate::core::layout::{CardVisual, LayoutInput, LayoutStrategy};
use crate::core::reveal::RevealMap;
use crate::core::selection::{PartitionedSelection, Selection, SelectionModel};
use crate::domain::model::{CardSlot, ModalMessage, ReadingRequest, RevealParams, RevealResponse};
use crate::domain::ports::{AccountGateway, ReadingGateway};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Selecting,
    ReadyToReveal,
    Revealing,
    Revealed,
}

/// An outbound reveal that has passed the guard and awaits its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealTicket {
    request: ReadingRequest,
}

impl RevealTicket {
    pub fn request(&self) -> &ReadingRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealAttempt {
    Dispatch(RevealTicket),
    Rejected(ModalMessage),
    Busy,
}

/// 單一占卜畫面：選牌、揭示與結果視窗
pub struct ReadingScreen {
    spec: ScreenSpec,
    layout: Box<dyn LayoutStrategy>,
    selection: Selection,
    revealed: RevealMap,
    params: RevealParams,
    modal: Option<ModalMessage>,
    in_flight: bool,
    showing_result: bool,
}

impl ReadingScreen {
    pub fn new(spec: ScreenSpec) -> Self {
        let layout = spec.layout.strategy();
        let selection = Self::fresh_selection(&spec);
        Self {
            spec,
            layout,
            selection,
            revealed: RevealMap::new(),
            params: RevealParams::default(),
            modal: None,
            in_flight: false,
            showing_result: false,
        }
    }

    fn fresh_selection(spec: &ScreenSpec) -> Selection {
        match spec.partitions {
            Some(names) => Selection::Partitioned(PartitionedSelection::new(
                names.iter().copied(),
                DEFAULT_PERIOD,
            )),
            None => Selection::Flat(SelectionModel::new(
                spec.max_selectable,
                spec.allow_multi_select,
            )),
        }
    }

    pub fn spec(&self) -> &ScreenSpec {
        &self.spec
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Vec<CardSlot> {
        self.selection.selected()
    }

    pub fn revealed(&self) -> &RevealMap {
        &self.revealed
    }

    pub fn params(&self) -> &RevealParams {
        &self.params
    }

    pub fn modal(&self) -> Option<&ModalMessage> {
        self.modal.as_ref()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn state(&self) -> ScreenState {
        if self.in_flight {
            return ScreenState::Revealing;
        }
        if self.showing_result {
            return ScreenState::Revealed;
        }
        match self.selection.len() {
            0 => ScreenState::Idle,
            n if n >= self.spec.required_count => ScreenState::ReadyToReveal,
            _ => ScreenState::Selecting,
        }
    }

    /// Routes a click on a slot through the layout into the selection.
    pub fn click(&mut self, index: CardSlot) -> bool {
        let mut changed = false;
        let selection = &mut self.selection;
        self.layout
            .click(self.spec.total_slots, index, &mut |slot| {
                changed = selection.toggle(slot);
            });
        if changed {
            self.showing_result = false;
        }
        changed
    }

    /// Switches the partition that receives clicks. Only meaningful on partitioned screens.
    pub fn set_active_partition(&mut self, name: &str) -> bool {
        match self.selection.as_partitioned_mut() {
            Some(parts) => parts.set_active(name),
            None => false,
        }
    }

    /// Stores a topic choice; unknown options are ignored.
    pub fn choose_topic(&mut self, field: TopicField, value: &str) -> bool {
        let known = self
            .spec
            .topic(field)
            .map(|topic| topic.options.contains(&value))
            .unwrap_or(false);
        if !known {
            tracing::warn!("Screen {} has no topic option {:?} = '{}'", self.spec.kind, field, value);
            return false;
        }
        field.assign(&mut self.params, value.to_string());
        true
    }

    fn guard_passes(&self) -> bool {
        let topics_ready = self
            .spec
            .topics
            .iter()
            .filter(|topic| topic.required)
            .all(|topic| !topic.field.read(&self.params).is_empty());
        self.selection.len() == self.spec.required_count && topics_ready
    }

    /// Checks the guard and, if it passes, moves into `Revealing`.
    pub fn begin_reveal(&mut self) -> RevealAttempt {
        if self.in_flight {
            tracing::warn!("Reveal already in flight on {}, ignoring", self.spec.kind);
            return RevealAttempt::Busy;
        }

        if !self.guard_passes() {
            let modal = ModalMessage::validation(self.spec.validation_message);
            self.modal = Some(modal.clone());
            return RevealAttempt::Rejected(modal);
        }

        let mut params = self.params.clone();
        if let Some(parts) = self.selection.as_partitioned() {
            params.time_periods = parts.non_empty_partitions();
        }
        let request = ReadingRequest::new(self.spec.endpoint, self.selection.selected(), params);

        tracing::info!(
            "🔮 Revealing {:?} on {} via {}",
            request.cards,
            self.spec.kind,
            self.spec.endpoint.path()
        );
        self.in_flight = true;
        RevealAttempt::Dispatch(RevealTicket { request })
    }

    /// Applies the outcome of a dispatched reveal.
    ///
    /// Failures leave the selection and reveal map untouched.
    pub fn complete_reveal(
        &mut self,
        ticket: RevealTicket,
        outcome: Result<RevealResponse>,
    ) -> &ModalMessage {
        self.in_flight = false;
        let cards = &ticket.request.cards;

        let modal = match outcome {
            Ok(response) => {
                let (slots, texts): (Vec<CardSlot>, Vec<&str>) = cards
                    .iter()
                    .enumerate()
                    .filter_map(|(position, &slot)| match response.meanings.get(position) {
                        Some(text) => Some((slot, text.as_str())),
                        None => {
                            tracing::warn!("No meaning at position {} for slot {}", position, slot);
                            None
                        }
                    })
                    .unzip();
                self.revealed.apply_reveal(&slots, &texts);
                self.showing_result = true;
                tracing::info!("✅ Revealed {} slot(s) on {}", slots.len(), self.spec.kind);
                ModalMessage::result(self.spec.success_text(&response, &ticket.request.params, &self.selection))
            }
            Err(e) => {
                tracing::error!("❌ Reveal failed on {}: {}", self.spec.kind, e);
                self.showing_result = false;
                ModalMessage::error(self.spec.error_text(&e.to_string()))
            }
        };

        self.modal.insert(modal)
    }

    /// Guard, dispatch and apply in one step.
    pub async fn reveal<G>(&mut self, gateway: &G) -> ModalMessage
    where
        G: ReadingGateway + ?Sized,
    {
        match self.begin_reveal() {
            RevealAttempt::Dispatch(ticket) => {
                let outcome = gateway.reveal(ticket.request()).await;
                self.complete_reveal(ticket, outcome).clone()
            }
            RevealAttempt::Rejected(modal) => modal,
            RevealAttempt::Busy => self
                .modal
                .clone()
                .unwrap_or_else(|| ModalMessage::validation(self.spec.validation_message)),
        }
    }

    fn quick_reading(&self, reading_type: &str) -> Option<QuickReading> {
        let quick = self
            .spec
            .quick_reading
            .filter(|quick| quick.options.contains(&reading_type));
        if quick.is_none() {
            tracing::warn!("Screen {} has no quick reading '{}'", self.spec.kind, reading_type);
        }
        quick
    }

    /// Answers a quick reading locally. `None` when the screen has no canned answer for it.
    pub fn canned_reading(&mut self, reading_type: &str) -> Option<ModalMessage> {
        match self.quick_reading(reading_type)?.source {
            QuickReadingSource::Canned(answer) => {
                let modal = ModalMessage::result(self.spec.quick_reading_text(reading_type, answer));
                Some(self.modal.insert(modal).clone())
            }
            QuickReadingSource::Remote => None,
        }
    }

    /// Asks the server for a quick reading of `reading_type`.
    ///
    /// Leaves the selection and reveal map alone whatever the outcome.
    pub async fn remote_reading<A>(&mut self, account: &A, reading_type: &str) -> Option<ModalMessage>
    where
        A: AccountGateway + ?Sized,
    {
        if self.quick_reading(reading_type)?.source != QuickReadingSource::Remote {
            return None;
        }

        tracing::info!("🔮 Quick reading '{}' on {}", reading_type, self.spec.kind);
        let modal = match account.tarot_reading(reading_type).await {
            Ok(result) => ModalMessage::result(self.spec.quick_reading_text(reading_type, &result)),
            Err(e) => {
                tracing::error!("❌ Quick reading failed on {}: {}", self.spec.kind, e);
                ModalMessage::error(self.spec.quick_reading_error(reading_type, &e.to_string()))
            }
        };
        Some(self.modal.insert(modal).clone())
    }

    /// Visual state of every slot for the configured layout.
    pub fn render(&self) -> Vec<CardVisual> {
        let selected = self.selection.selected();
        self.layout.arrange(&LayoutInput {
            total_slots: self.spec.total_slots,
            selected: &selected,
            revealed: &self.revealed,
            label_prefix: self.spec.label_prefix,
        })
    }

    /// Back to a freshly mounted screen.
    pub fn reset(&mut self) {
        self.selection = Self::fresh_selection(&self.spec);
        self.revealed.reset();
        self.params = RevealParams::default();
        self.modal = None;
        self.in_flight = false;
        self.showing_result = false;
    }
}
