//! Host integration
//!
//! The review application owns the UI and tells us when a card is answered.

use std::sync::Arc;

use parking_lot::Mutex;

use super::report::GradeOutcome;
use super::Engine;

/// Callback the host invokes once per completed review with its ease code
pub type AnswerHandler = Box<dyn FnMut(u8) + Send>;

/// Review application that can report answered cards.
///
/// Implementations must call the registered handler exactly once per
/// completed review, synchronously, one review at a time.
pub trait ReviewHost {
    fn register_answer_handler(&mut self, handler: AnswerHandler);
}

/// Wire a shared engine into `host`.
///
/// Each answer is scored under the engine lock and the outcome handed to
/// `on_outcome` for display.
pub fn attach_to_host<H, F>(engine: Arc<Mutex<Engine>>, host: &mut H, mut on_outcome: F)
where
    H: ReviewHost + ?Sized,
    F: FnMut(&GradeOutcome) + Send + 'static,
{
    host.register_answer_handler(Box::new(move |ease| {
        let outcome = engine.lock().process_ease(ease);
        on_outcome(&outcome);
    }));
}
