use crate::error::Result;
use crate::utterance::Utterance;

pub trait UtteranceEncoder {
    fn write_utterance(&mut self, utterance: &Utterance) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
