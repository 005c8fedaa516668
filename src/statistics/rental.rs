use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

use crate::config::StatisticsConfig;
use crate::dates::{self, YearMonth};
use crate::decimal::Money;
use crate::rental::{Agreement, MaintenanceRecord, Property, RentPayment};
use crate::types::{AgreementId, PropertyId};

/// agreement whose end date falls inside the expiry window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringAgreement {
    pub agreement_id: AgreementId,
    pub property_id: PropertyId,
    pub tenant_name: String,
    #[serde(with = "dates::dmy")]
    pub end_date: NaiveDate,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalDashboard {
    #[serde(with = "dates::dmy")]
    pub as_of: NaiveDate,
    pub property_count: usize,
    pub occupied: usize,
    pub vacant: usize,
    /// occupied / properties as a percentage, 2dp
    pub occupancy_rate: Decimal,
    pub expected_monthly_rent: Money,
    pub rent_collected: Money,
    pub rent_pending: Money,
    pub maintenance_spend: Money,
    pub open_maintenance: usize,
    pub expiring_agreements: Vec<ExpiringAgreement>,
}

/// rental projection for the month containing `as_of`.
///
/// A property is occupied when at least one active agreement points at it. Rent is
/// attributed by its `period`, not by the date it was received.
pub fn rental_dashboard(
    config: &StatisticsConfig,
    properties: &[Property],
    agreements: &[Agreement],
    rent_payments: &[RentPayment],
    maintenance: &[MaintenanceRecord],
    as_of: NaiveDate,
) -> RentalDashboard {
    let month = YearMonth::of(as_of);
    let known: HashSet<PropertyId> = properties.iter().map(|p| p.id).collect();
    let active: Vec<&Agreement> = agreements
        .iter()
        .filter(|a| known.contains(&a.property_id) && a.is_active(as_of))
        .collect();

    let occupied_ids: HashSet<PropertyId> = active.iter().map(|a| a.property_id).collect();
    let occupied = occupied_ids.len();
    let property_count = properties.len();
    let occupancy_rate = if property_count == 0 {
        Decimal::ZERO
    } else {
        let occupied = Decimal::from(occupied as u64);
        (occupied * Decimal::ONE_HUNDRED / Decimal::from(property_count as u64)).round_dp(2)
    };

    let collected_for = |agreement_id: AgreementId| -> Money {
        rent_payments
            .iter()
            .filter(|p| p.agreement_id == agreement_id && p.period == month)
            .map(|p| p.amount)
            .sum()
    };

    let mut expected_monthly_rent = Money::ZERO;
    let mut rent_pending = Money::ZERO;
    for agreement in &active {
        expected_monthly_rent += agreement.monthly_rent;
        rent_pending += (agreement.monthly_rent - collected_for(agreement.id)).max(Money::ZERO);
    }

    let agreement_ids: HashSet<AgreementId> = agreements
        .iter()
        .filter(|a| known.contains(&a.property_id))
        .map(|a| a.id)
        .collect();
    let rent_collected: Money = rent_payments
        .iter()
        .filter(|p| p.period == month && agreement_ids.contains(&p.agreement_id))
        .map(|p| p.amount)
        .sum();

    let ours = maintenance.iter().filter(|m| known.contains(&m.property_id));
    let maintenance_spend: Money = ours
        .clone()
        .filter(|m| month.contains(m.date))
        .map(|m| m.cost)
        .sum();
    let open_maintenance = ours.filter(|m| m.is_open()).count();

    let window = config.expiring_agreement_window_days as i64;
    let mut expiring_agreements: Vec<ExpiringAgreement> = active
        .iter()
        .filter_map(|a| {
            let end_date = a.end_date?;
            let days_remaining = dates::days_between(as_of, end_date);
            (days_remaining <= window).then(|| ExpiringAgreement {
                agreement_id: a.id,
                property_id: a.property_id,
                tenant_name: a.tenant_name.clone(),
                end_date,
                days_remaining,
            })
        })
        .collect();
    expiring_agreements
        .sort_by(|a, b| (a.end_date, a.agreement_id).cmp(&(b.end_date, b.agreement_id)));

    RentalDashboard {
        as_of,
        property_count,
        occupied,
        vacant: property_count - occupied,
        occupancy_rate,
        expected_monthly_rent,
        rent_collected,
        rent_pending,
        maintenance_spend,
        open_maintenance,
        expiring_agreements,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRentalSummary {
    pub month: YearMonth,
    pub rent_collected: Money,
    pub maintenance_cost: Money,
    /// rent minus maintenance, may be negative
    pub net_income: Money,
}

/// rent by period and maintenance by date, rolled up per calendar month
pub fn rental_monthly_report(
    rent_payments: &[RentPayment],
    maintenance: &[MaintenanceRecord],
) -> Vec<MonthlyRentalSummary> {
    let mut months: BTreeMap<YearMonth, (Money, Money)> = BTreeMap::new();

    for payment in rent_payments {
        months.entry(payment.period).or_default().0 += payment.amount;
    }
    for record in maintenance {
        months.entry(YearMonth::of(record.date)).or_default().1 += record.cost;
    }

    months
        .into_iter()
        .map(|(month, (rent_collected, maintenance_cost))| MonthlyRentalSummary {
            month,
            rent_collected,
            maintenance_cost,
            net_income: rent_collected - maintenance_cost,
        })
        .collect()
}
