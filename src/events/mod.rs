pub mod dispatcher;

use serde::Serialize;

/// Type of a domain event occurring in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VacancyEventKind {
    Created,
    Updated,
    Deleted,
}

impl VacancyEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyEventKind::Created => "VacancyCreated",
            VacancyEventKind::Updated => "VacancyUpdated",
            VacancyEventKind::Deleted => "VacancyDeleted",
        }
    }
}

/// A domain event: what happened and which aggregate it happened to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VacancyEvent {
    pub kind: VacancyEventKind,
    pub vacancy_id: i64,
}

impl VacancyEvent {
    pub fn created(vacancy_id: i64) -> Self {
        Self {
            kind: VacancyEventKind::Created,
            vacancy_id,
        }
    }

    pub fn updated(vacancy_id: i64) -> Self {
        Self {
            kind: VacancyEventKind::Updated,
            vacancy_id,
        }
    }

    pub fn deleted(vacancy_id: i64) -> Self {
        Self {
            kind: VacancyEventKind::Deleted,
            vacancy_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn aggregate_id(&self) -> i64 {
        self.vacancy_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_kind_and_id() {
        let event = VacancyEvent::updated(42);
        assert_eq!(event.event_type(), "VacancyUpdated");
        assert_eq!(event.aggregate_id(), 42);
    }
}
