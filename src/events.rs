use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus, PaymentId};

/// everything the ledger reports back to its host (notifications, audit trail)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // schedule events
    ScheduleGenerated {
        loan_id: LoanId,
        installments: u32,
        total_interest: Money,
        total_amount: Money,
        #[serde(with = "dates::dmy")]
        first_due: NaiveDate,
    },
    TermsAmended {
        loan_id: LoanId,
        old_principal: Money,
        new_principal: Money,
        installments: u32,
    },

    // payment events
    PaymentRecorded {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        applied_to_principal: Money,
        applied_to_interest: Money,
        #[serde(with = "dates::dmy")]
        payment_date: NaiveDate,
    },
    InstallmentSettled {
        loan_id: LoanId,
        sequence: u32,
        #[serde(with = "dates::dmy")]
        paid_date: NaiveDate,
    },
    OverpaymentCarried {
        loan_id: LoanId,
        from_sequence: u32,
        to_sequence: u32,
        amount: Money,
    },
    ExcessDiscarded {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
    },

    // status events
    LoanStatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        #[serde(with = "dates::dmy")]
        as_of: NaiveDate,
    },
    LoanDefaulted {
        loan_id: LoanId,
        outstanding: Money,
        #[serde(with = "dates::dmy")]
        as_of: NaiveDate,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_drains() {
        let mut store = EventStore::new();
        store.emit(Event::ExcessDiscarded {
            loan_id: Uuid::nil(),
            payment_id: Uuid::nil(),
            amount: Money::from_major(5),
        });
        assert_eq!(store.len(), 1);

        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_event_json_uses_day_first_dates() {
        let event = Event::InstallmentSettled {
            loan_id: Uuid::nil(),
            sequence: 3,
            paid_date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"paid_date\":\"09-04-2024\""));
    }
}
