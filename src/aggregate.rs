//! Combines independently extracted monthly records into one view.
//!
//! Months are folded in calendar order into a local [`Accumulator`]. Missing
//! months and missing fields contribute zero; nothing here can fail.

use crate::month::Month;
use crate::schema::{AggregatedRecord, MonthlyRecord, TrendSeries};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Combines the selected months into one [`AggregatedRecord`].
///
/// The selection order does not matter and duplicates collapse. Months with
/// no stored record are skipped, so `trends.labels` may be shorter than the
/// selection.
pub fn combine<I>(selected: I, records: &BTreeMap<Month, MonthlyRecord>) -> AggregatedRecord
where
    I: IntoIterator<Item = Month>,
{
    let ordered: BTreeSet<Month> = selected.into_iter().collect();

    let accumulator = ordered
        .into_iter()
        .fold(Accumulator::default(), |mut acc, month| {
            match records.get(&month) {
                Some(record) => acc.absorb(month, record),
                None => debug!("No stored report for {}, skipping", month),
            }
            acc
        });

    accumulator.finish()
}

/// Months that have a stored record, in calendar order.
pub fn available_months(records: &BTreeMap<Month, MonthlyRecord>) -> Vec<Month> {
    records.keys().copied().collect()
}

/// Formats a visit count with the dashboard's magnitude suffixes.
///
/// `1_234_567` → `"1.23tr"`, `4_500` → `"4.5k"`, `42` → `"42"`.
/// Ties round up (`1_250` → `"1.3k"`), so rounding is done on integers.
pub fn format_visit_count(count: u64) -> String {
    if count >= 1_000_000 {
        let hundredths = count.saturating_add(5_000) / 10_000;
        format!("{}.{:02}tr", hundredths / 100, hundredths % 100)
    } else if count >= 1_000 {
        let tenths = (count + 50) / 100;
        format!("{}.{}k", tenths / 10, tenths % 10)
    } else {
        count.to_string()
    }
}

/// `part / total` as a percentage rounded to one decimal; zero when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[derive(Default)]
struct Accumulator {
    record: MonthlyRecord,
}

impl Accumulator {
    // Counts saturate at u64::MAX instead of overflowing.
    fn absorb(&mut self, month: Month, month_record: &MonthlyRecord) {
        let acc = &mut self.record;

        acc.trends.labels.push(month.label());
        for series in TrendSeries::ALL {
            let value = month_record.trends.single_value(series);
            acc.trends.series_mut(series).push(value);
        }

        for (sum, value) in acc
            .composition
            .data
            .iter_mut()
            .zip(month_record.composition.data)
        {
            *sum = sum.saturating_add(value);
        }

        let h = &month_record.highlights;
        let highlights = &mut acc.highlights;
        highlights.tong_kham_so = highlights.tong_kham_so.saturating_add(h.tong_kham_so);
        highlights.kham_noi_tru = highlights.kham_noi_tru.saturating_add(h.kham_noi_tru);
        highlights.tieu_chay = highlights.tieu_chay.saturating_add(h.tieu_chay);
        highlights.hiv = highlights.hiv.saturating_add(h.hiv);
        highlights.nao_mo_cau = highlights.nao_mo_cau.saturating_add(h.nao_mo_cau);

        // Stored percentages are ignored; they are re-derived in `finish`.
        let t = &month_record.accidents.traffic_accidents;
        let traffic = &mut acc.accidents.traffic_accidents;
        traffic.total = traffic.total.saturating_add(t.total);
        traffic.local_cases = traffic.local_cases.saturating_add(t.local_cases);
        traffic.alcohol_cases = traffic.alcohol_cases.saturating_add(t.alcohol_cases);

        let o = &month_record.accidents.occupational_accidents;
        let occupational = &mut acc.accidents.occupational_accidents;
        occupational.total = occupational.total.saturating_add(o.total);
        occupational.injuries = occupational.injuries.saturating_add(o.injuries);
        occupational.deaths = occupational.deaths.saturating_add(o.deaths);

        let d = &month_record.additional_diseases;
        let diseases = &mut acc.additional_diseases;
        diseases.dau_mua_khi = diseases.dau_mua_khi.saturating_add(d.dau_mua_khi);
        diseases.bach_hau = diseases.bach_hau.saturating_add(d.bach_hau);
        diseases.sars = diseases.sars.saturating_add(d.sars);
        diseases.cum_ah5n1 = diseases.cum_ah5n1.saturating_add(d.cum_ah5n1);
        diseases.cum_ah1n1 = diseases.cum_ah1n1.saturating_add(d.cum_ah1n1);
    }

    fn finish(self) -> AggregatedRecord {
        let mut record = self.record;

        let traffic = &mut record.accidents.traffic_accidents;
        traffic.local_percentage = percentage(traffic.local_cases, traffic.total);
        traffic.alcohol_percentage = percentage(traffic.alcohol_cases, traffic.total);

        record.highlights.tong_kham = format_visit_count(record.highlights.tong_kham_so);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TrafficAccidents, COMPOSITION_LABELS};

    fn month(n: u32) -> Month {
        Month::new(n).unwrap()
    }

    fn record(sxh: u64, tcm: u64, soi: u64, visits: u64) -> MonthlyRecord {
        let mut r = MonthlyRecord::default();
        r.trends.labels = vec!["PlaceholderMonth".to_string()];
        r.trends.sxh = vec![sxh];
        r.trends.tcm = vec![tcm];
        r.trends.soi = vec![soi];
        r.composition.data = [sxh, tcm, soi];
        r.highlights.tong_kham_so = visits;
        r
    }

    #[test]
    fn test_visit_count_tiers() {
        assert_eq!(format_visit_count(1_234_567), "1.23tr");
        assert_eq!(format_visit_count(4_500), "4.5k");
        assert_eq!(format_visit_count(42), "42");
        assert_eq!(format_visit_count(0), "0");
        assert_eq!(format_visit_count(999), "999");
        assert_eq!(format_visit_count(1_000), "1.0k");
        assert_eq!(format_visit_count(1_000_000), "1.00tr");
    }

    #[test]
    fn test_visit_count_ties_round_up() {
        assert_eq!(format_visit_count(1_250), "1.3k");
        assert_eq!(format_visit_count(2_250), "2.3k");
        assert_eq!(format_visit_count(1_249), "1.2k");
        assert_eq!(format_visit_count(999_950), "1000.0k");
        assert_eq!(format_visit_count(1_125_000), "1.13tr");
        assert_eq!(format_visit_count(1_124_999), "1.12tr");
        assert_eq!(format_visit_count(12_345_000), "12.35tr");
        assert_eq!(format_visit_count(u64::MAX), "18446744073709.55tr");
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let mut big = record(u64::MAX, 1, 0, u64::MAX);
        big.accidents.traffic_accidents.total = u64::MAX;
        big.accidents.traffic_accidents.local_cases = u64::MAX;
        big.additional_diseases.sars = u64::MAX;

        let records = BTreeMap::from([(month(1), big), (month(2), record(1, 1, 1, 1))]);
        let combined = combine([month(1), month(2)], &records);

        assert_eq!(combined.highlights.tong_kham_so, u64::MAX);
        assert_eq!(combined.composition.data, [u64::MAX, 2, 1]);
        assert_eq!(combined.trends.sxh, vec![u64::MAX, 1]);
        assert_eq!(combined.accidents.traffic_accidents.total, u64::MAX);
        assert_eq!(combined.accidents.traffic_accidents.local_percentage, 100.0);
        assert_eq!(combined.additional_diseases.sars, u64::MAX);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(22, 30), 73.3);
        assert_eq!(percentage(10, 30), 33.3);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn test_order_of_selection_does_not_matter() {
        let records = BTreeMap::from([
            (month(1), record(10, 5, 1, 100)),
            (month(3), record(30, 15, 3, 300)),
        ]);

        let a = combine([month(3), month(1)], &records);
        let b = combine([month(1), month(3)], &records);

        assert_eq!(a, b);
        assert_eq!(a.trends.labels, vec!["Tháng 1", "Tháng 3"]);
        assert_eq!(a.trends.sxh, vec![10, 30]);
        assert_eq!(a.trends.soi, vec![1, 3]);
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let records = BTreeMap::from([
            (month(2), record(2, 0, 0, 0)),
            (month(10), record(10, 0, 0, 0)),
        ]);

        let combined = combine([month(10), month(2)], &records);
        assert_eq!(combined.trends.labels, vec!["Tháng 2", "Tháng 10"]);
        assert_eq!(combined.trends.sxh, vec![2, 10]);
    }

    #[test]
    fn test_missing_month_is_skipped() {
        let combined = combine([month(5)], &BTreeMap::new());

        assert!(combined.trends.labels.is_empty());
        assert!(combined.trends.sxh.is_empty());
        assert_eq!(combined.composition.data, [0, 0, 0]);
        assert_eq!(combined.highlights.tong_kham_so, 0);
        assert_eq!(combined.accidents.traffic_accidents, TrafficAccidents::default());
    }

    #[test]
    fn test_partially_missing_selection() {
        let records = BTreeMap::from([(month(4), record(4, 4, 4, 40))]);
        let combined = combine([month(3), month(4), month(5)], &records);

        assert_eq!(combined.trends.labels, vec!["Tháng 4"]);
        for series in TrendSeries::ALL {
            assert_eq!(combined.trends.series(series).len(), 1);
        }
    }

    #[test]
    fn test_empty_selection() {
        let records = BTreeMap::from([(month(1), record(1, 1, 1, 1))]);
        let combined = combine(std::iter::empty::<Month>(), &records);

        assert!(combined.trends.labels.is_empty());
        assert_eq!(combined.composition.labels, COMPOSITION_LABELS);
        assert_eq!(combined.composition.data, [0, 0, 0]);
        assert_eq!(combined.highlights.tong_kham, "0");
    }

    #[test]
    fn test_sums_and_series() {
        let mut jan = record(120, 60, 10, 600_000);
        jan.trends.cum_ah1n1 = vec![2];
        jan.highlights.kham_noi_tru = 100;
        jan.highlights.hiv = 3;
        jan.accidents.occupational_accidents.total = 4;
        jan.accidents.occupational_accidents.deaths = 1;
        jan.additional_diseases.cum_ah1n1 = 2;

        let mut feb = record(80, 40, 5, 700_000);
        feb.highlights.kham_noi_tru = 50;
        feb.accidents.occupational_accidents.total = 2;
        feb.accidents.occupational_accidents.injuries = 2;
        feb.additional_diseases.bach_hau = 1;

        let records = BTreeMap::from([(month(1), jan), (month(2), feb)]);
        let combined = combine([month(2), month(1)], &records);

        assert_eq!(combined.composition.data, [200, 100, 15]);
        assert_eq!(combined.highlights.tong_kham_so, 1_300_000);
        assert_eq!(combined.highlights.tong_kham, "1.30tr");
        assert_eq!(combined.highlights.kham_noi_tru, 150);
        assert_eq!(combined.highlights.hiv, 3);
        assert_eq!(combined.accidents.occupational_accidents.total, 6);
        assert_eq!(combined.accidents.occupational_accidents.injuries, 2);
        assert_eq!(combined.accidents.occupational_accidents.deaths, 1);
        assert_eq!(combined.additional_diseases.cum_ah1n1, 2);
        assert_eq!(combined.additional_diseases.bach_hau, 1);
        // Feb has no H1N1 series value recorded, so it contributes zero.
        assert_eq!(combined.trends.cum_ah1n1, vec![2, 0]);
    }

    #[test]
    fn test_percentages_are_recomputed_not_summed() {
        let mut jan = record(0, 0, 0, 0);
        jan.accidents.traffic_accidents = TrafficAccidents {
            total: 10,
            local_cases: 7,
            local_percentage: 70.0,
            alcohol_cases: 2,
            alcohol_percentage: 20.0,
        };
        let mut feb = record(0, 0, 0, 0);
        feb.accidents.traffic_accidents = TrafficAccidents {
            total: 20,
            local_cases: 15,
            local_percentage: 75.0,
            alcohol_cases: 8,
            alcohol_percentage: 40.0,
        };

        let records = BTreeMap::from([(month(1), jan), (month(2), feb)]);
        let traffic = combine([month(1), month(2)], &records)
            .accidents
            .traffic_accidents;

        assert_eq!(traffic.total, 30);
        assert_eq!(traffic.local_cases, 22);
        assert_eq!(traffic.alcohol_cases, 10);
        assert_eq!(traffic.local_percentage, 73.3);
        assert_eq!(traffic.alcohol_percentage, 33.3);
        // Summing (145.0) or averaging (72.5) the stored percentages would be wrong.
        assert_ne!(traffic.local_percentage, 145.0);
        assert_ne!(traffic.local_percentage, 72.5);
    }

    #[test]
    fn test_zero_total_guard() {
        let mut jan = record(1, 1, 1, 1);
        jan.accidents.traffic_accidents.local_percentage = 50.0;
        let records = BTreeMap::from([(month(1), jan)]);

        let traffic = combine([month(1)], &records).accidents.traffic_accidents;
        assert_eq!(traffic.total, 0);
        assert_eq!(traffic.local_percentage, 0.0);
        assert_eq!(traffic.alcohol_percentage, 0.0);
        assert!(!traffic.local_percentage.is_nan());
    }

    #[test]
    fn test_available_months_in_calendar_order() {
        let records = BTreeMap::from([
            (month(11), MonthlyRecord::default()),
            (month(2), MonthlyRecord::default()),
            (month(7), MonthlyRecord::default()),
        ]);
        assert_eq!(available_months(&records), vec![month(2), month(7), month(11)]);
    }
}
