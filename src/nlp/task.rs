use std::fmt;
use std::str::FromStr;

use super::error::NlpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlpTask {
    Ner,
    Summarization,
    Sentiment,
}

impl NlpTask {
    pub const ALL: [NlpTask; 3] = [NlpTask::Ner, NlpTask::Summarization, NlpTask::Sentiment];

    pub fn as_str(&self) -> &'static str {
        match self {
            NlpTask::Ner => "ner",
            NlpTask::Summarization => "summarization",
            NlpTask::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for NlpTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for NlpTask {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ner" => Ok(NlpTask::Ner),
            "summarization" => Ok(NlpTask::Summarization),
            "sentiment" => Ok(NlpTask::Sentiment),
            other => Err(NlpError::UnknownTask(other.to_string())),
        }
    }
}

/// One dashboard submission. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NlpRequest {
    pub task: NlpTask,
    pub text: String,
    /// Only meaningful for `ner`
    pub entity: Option<String>,
}

impl NlpRequest {
    /// Validate raw form values. `ner` needs a non-blank entity label; the
    /// other tasks ignore it.
    pub fn from_form(task: &str, text: &str, entity: Option<&str>) -> Result<Self, NlpError> {
        let task: NlpTask = task.parse()?;
        let entity = entity.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string);
        match task {
            NlpTask::Ner if entity.is_none() => Err(NlpError::MissingEntity),
            NlpTask::Ner => Ok(Self { task, text: text.to_string(), entity }),
            _ => Ok(Self { task, text: text.to_string(), entity: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tasks() {
        for t in NlpTask::ALL {
            assert_eq!(t.as_str().parse::<NlpTask>().unwrap(), t);
        }
        assert!(matches!("translate".parse::<NlpTask>(), Err(NlpError::UnknownTask(s)) if s == "translate"));
    }

    #[test]
    fn ner_requires_entity() {
        assert!(matches!(NlpRequest::from_form("ner", "text", None), Err(NlpError::MissingEntity)));
        assert!(matches!(NlpRequest::from_form("ner", "text", Some("   ")), Err(NlpError::MissingEntity)));
        let r = NlpRequest::from_form("ner", "Ann flew to Oslo", Some(" city ")).unwrap();
        assert_eq!(r.entity.as_deref(), Some("city"));
    }

    #[test]
    fn entity_is_dropped_for_other_tasks() {
        let r = NlpRequest::from_form("sentiment", "great day", Some("person")).unwrap();
        assert_eq!(r.task, NlpTask::Sentiment);
        assert_eq!(r.entity, None);
        assert_eq!(r.text, "great day");
    }
}
