//! Voucher list filtering and sorting.

use chrono::NaiveDate;
use kassenwart_shared::{BudgetId, CategoryId, EarmarkId, PageRequest, PageResponse, TermId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Classification, PaymentMethod, Sphere, Voucher, VoucherType};

/// Filter for voucher lists. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherFilter {
    /// Earliest date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest date (inclusive).
    pub to: Option<NaiveDate>,
    /// Direction.
    #[serde(rename = "type")]
    pub voucher_type: Option<VoucherType>,
    /// Payment method; transfers match on either leg.
    pub payment_method: Option<PaymentMethod>,
    /// Sphere.
    pub sphere: Option<Sphere>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Earmark allocated to.
    pub earmark_id: Option<EarmarkId>,
    /// Budget allocated to.
    pub budget_id: Option<BudgetId>,
    /// Tag (exact, case-insensitive).
    pub tag: Option<String>,
    /// Taxonomy term.
    pub term_id: Option<TermId>,
    /// Free text over description, voucher number and tags.
    pub q: Option<String>,
}

impl VoucherFilter {
    /// Whether `voucher` passes the filter.
    #[must_use]
    pub fn matches(&self, voucher: &Voucher) -> bool {
        if self.from.is_some_and(|from| voucher.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| voucher.date > to) {
            return false;
        }
        if self.voucher_type.is_some_and(|t| voucher.voucher_type != t) {
            return false;
        }
        if self.payment_method.is_some_and(|m| !voucher.payment.involves(m)) {
            return false;
        }
        if let Some(sphere) = self.sphere
            && voucher.classification != Classification::Sphere(sphere)
        {
            return false;
        }
        if let Some(category) = self.category_id
            && voucher.classification != Classification::Category(category)
        {
            return false;
        }
        if let Some(earmark_id) = self.earmark_id
            && !voucher.earmark_ids().any(|id| id == earmark_id)
        {
            return false;
        }
        if let Some(budget_id) = self.budget_id
            && !voucher.budget_ids().any(|id| id == budget_id)
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !voucher.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
        {
            return false;
        }
        if let Some(term_id) = self.term_id
            && !voucher.terms.iter().any(|t| t.term_id == term_id)
        {
            return false;
        }
        if let Some(q) = &self.q {
            let needle = q.trim().to_lowercase();
            if !needle.is_empty() && !Self::text_matches(voucher, &needle) {
                return false;
            }
        }
        true
    }

    fn text_matches(voucher: &Voucher, needle: &str) -> bool {
        voucher.description.to_lowercase().contains(needle)
            || voucher.voucher_no.to_lowercase().contains(needle)
            || voucher.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Sortable voucher columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Booking date.
    #[default]
    Date,
    /// Net amount.
    Net,
    /// Gross amount.
    Gross,
    /// Label of the first allocated budget.
    Budget,
    /// Label of the first allocated earmark.
    Earmark,
    /// Payment method.
    PaymentMethod,
    /// Sphere or category.
    Category,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherSort {
    /// Column.
    #[serde(default)]
    pub field: SortField,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Date(NaiveDate),
    Amount(Decimal),
    Text(String),
}

/// Applies filter, sort and pagination to a voucher set.
pub struct VoucherQuery;

impl VoucherQuery {
    /// Filters, sorts (ties broken by id) and paginates.
    ///
    /// `budget_label` and `earmark_label` resolve the labels used when sorting
    /// by budget or earmark.
    pub fn run<'v, I, B, E>(
        vouchers: I,
        filter: &VoucherFilter,
        sort: VoucherSort,
        page: PageRequest,
        budget_label: B,
        earmark_label: E,
    ) -> PageResponse<Voucher>
    where
        I: IntoIterator<Item = &'v Voucher>,
        B: Fn(BudgetId) -> Option<String>,
        E: Fn(EarmarkId) -> Option<String>,
    {
        let mut keyed: Vec<(SortKey, &Voucher)> = vouchers
            .into_iter()
            .filter(|v| filter.matches(v))
            .map(|v| (Self::sort_key(v, sort.field, &budget_label, &earmark_label), v))
            .collect();

        keyed.sort_by(|(ka, a), (kb, b)| {
            let ordering = ka.cmp(kb).then_with(|| a.id.cmp(&b.id));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let rows = keyed.into_iter().map(|(_, v)| v.clone()).collect();
        PageResponse::paginate(rows, page)
    }

    fn sort_key<B, E>(
        voucher: &Voucher,
        field: SortField,
        budget_label: &B,
        earmark_label: &E,
    ) -> SortKey
    where
        B: Fn(BudgetId) -> Option<String>,
        E: Fn(EarmarkId) -> Option<String>,
    {
        match field {
            SortField::Date => SortKey::Date(voucher.date),
            SortField::Net => SortKey::Amount(voucher.amounts.net_amount),
            SortField::Gross => SortKey::Amount(voucher.amounts.gross_amount),
            SortField::Budget => SortKey::Text(
                voucher
                    .budget_ids()
                    .next()
                    .and_then(budget_label)
                    .unwrap_or_default()
                    .to_lowercase(),
            ),
            SortField::Earmark => SortKey::Text(
                voucher
                    .earmark_ids()
                    .next()
                    .and_then(earmark_label)
                    .unwrap_or_default()
                    .to_lowercase(),
            ),
            SortField::PaymentMethod => SortKey::Text(voucher.payment.sort_key()),
            SortField::Category => SortKey::Text(voucher.classification.sort_key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::BudgetAllocation;
    use crate::amount::AmountCalculator;
    use crate::voucher::types::Payment;
    use chrono::Utc;
    use kassenwart_shared::VoucherId;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn voucher(id: i64, day: u32, gross: Decimal, description: &str) -> Voucher {
        let now = Utc::now();
        Voucher {
            id: VoucherId::new(id),
            voucher_no: format!("2025-{id:05}"),
            voucher_type: VoucherType::Out,
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            classification: Classification::Sphere(Sphere::Ideell),
            payment: Payment::Method(PaymentMethod::Bar),
            amounts: AmountCalculator::transfer(gross).unwrap(),
            description: description.into(),
            budgets: vec![],
            earmarks: vec![],
            tags: BTreeSet::new(),
            terms: vec![],
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(page: &PageResponse<Voucher>) -> Vec<i64> {
        page.rows.iter().map(|v| v.id.into_inner()).collect()
    }

    fn run(
        vouchers: &[Voucher],
        filter: &VoucherFilter,
        sort: VoucherSort,
    ) -> PageResponse<Voucher> {
        VoucherQuery::run(vouchers, filter, sort, PageRequest::default(), |_| None, |_| None)
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let vouchers = [
            voucher(1, 1, dec!(10), "a"),
            voucher(2, 5, dec!(10), "b"),
            voucher(3, 9, dec!(10), "c"),
        ];
        let filter = VoucherFilter {
            from: NaiveDate::from_ymd_opt(2025, 1, 5),
            to: NaiveDate::from_ymd_opt(2025, 1, 9),
            ..VoucherFilter::default()
        };
        let page = run(&vouchers, &filter, VoucherSort::default());
        assert_eq!(page.total, 2);
        assert_eq!(ids(&page), vec![3, 2]);
    }

    #[test]
    fn test_free_text_searches_number_description_and_tags() {
        let mut tagged = voucher(3, 3, dec!(10), "Miete");
        tagged.tags.insert("Sommerfest".into());
        let vouchers = [
            voucher(1, 1, dec!(10), "Getränke Sommerfest"),
            voucher(2, 2, dec!(10), "Porto"),
            tagged,
        ];

        let filter = VoucherFilter {
            q: Some("SOMMER".into()),
            ..VoucherFilter::default()
        };
        let sort = VoucherSort { field: SortField::Date, direction: SortDirection::Asc };
        assert_eq!(ids(&run(&vouchers, &filter, sort)), vec![1, 3]);

        let filter = VoucherFilter {
            q: Some("2025-00002".into()),
            ..VoucherFilter::default()
        };
        assert_eq!(ids(&run(&vouchers, &filter, sort)), vec![2]);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let vouchers = [
            voucher(3, 1, dec!(10), "x"),
            voucher(1, 1, dec!(10), "y"),
            voucher(2, 1, dec!(20), "z"),
        ];
        let asc = VoucherSort { field: SortField::Gross, direction: SortDirection::Asc };
        assert_eq!(ids(&run(&vouchers, &VoucherFilter::default(), asc)), vec![1, 3, 2]);

        let desc = VoucherSort { field: SortField::Gross, direction: SortDirection::Desc };
        assert_eq!(ids(&run(&vouchers, &VoucherFilter::default(), desc)), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_budget_label() {
        let mut a = voucher(1, 1, dec!(10), "a");
        a.budgets = vec![BudgetAllocation {
            budget_id: BudgetId::new(1),
            amount: dec!(10),
        }];
        let mut b = voucher(2, 1, dec!(10), "b");
        b.budgets = vec![BudgetAllocation {
            budget_id: BudgetId::new(2),
            amount: dec!(10),
        }];
        let vouchers = [a, b];

        let page = VoucherQuery::run(
            &vouchers,
            &VoucherFilter::default(),
            VoucherSort { field: SortField::Budget, direction: SortDirection::Asc },
            PageRequest::default(),
            |id| Some(if id == BudgetId::new(1) { "Zeltlager" } else { "Ausflug" }.to_string()),
            |_| None,
        );
        assert_eq!(ids(&page), vec![2, 1]);
    }

    #[test]
    fn test_budget_filter_and_pagination() {
        let mut vouchers: Vec<Voucher> = (1..=5).map(|i| voucher(i, 1, dec!(10), "v")).collect();
        for v in vouchers.iter_mut().take(3) {
            v.budgets = vec![BudgetAllocation {
                budget_id: BudgetId::new(7),
                amount: dec!(5),
            }];
        }

        let filter = VoucherFilter {
            budget_id: Some(BudgetId::new(7)),
            ..VoucherFilter::default()
        };
        let page = VoucherQuery::run(
            &vouchers,
            &filter,
            VoucherSort { field: SortField::Date, direction: SortDirection::Asc },
            PageRequest::new(1, 1),
            |_| None,
            |_| None,
        );
        assert_eq!(page.total, 3);
        assert_eq!(ids(&page), vec![2]);
    }

    #[test]
    fn test_payment_filter_matches_transfer_legs() {
        let mut transfer = voucher(1, 1, dec!(10), "t");
        transfer.voucher_type = VoucherType::Transfer;
        transfer.payment = Payment::Transfer { from: PaymentMethod::Bar, to: PaymentMethod::Bank };
        let vouchers = [transfer, voucher(2, 1, dec!(10), "bar")];

        let filter = VoucherFilter {
            payment_method: Some(PaymentMethod::Bank),
            ..VoucherFilter::default()
        };
        assert_eq!(ids(&run(&vouchers, &filter, VoucherSort::default())), vec![1]);
    }
}
