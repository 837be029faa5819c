//! Per-line and document-level VAT/rebate arithmetic.
//!
//! All amounts stay unrounded [`Decimal`]s; rounding to two places happens
//! only when a value is formatted for display.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::codes::{ExemptionCode, last_exemption};
use super::error::FiskalError;
use super::types::{Invoice, LineItem};

const HUNDRED: Decimal = dec!(100);

/// Largest declared total, line amount or running total accepted.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Derived amounts for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// `quantity × unit_price_before_vat`, before rebate.
    pub price_before_vat: Decimal,
    /// Unit price before VAT with the rebate applied.
    pub rebated_unit_price: Decimal,
    /// Line base after rebate.
    pub line_base_after_rebate: Decimal,
    /// VAT per unit, on the rebated unit price.
    pub unit_vat: Decimal,
    /// VAT for the whole line.
    pub line_vat_amount: Decimal,
    /// Rebated unit price plus unit VAT.
    pub unit_price_after_vat: Decimal,
    /// Line base plus line VAT.
    pub line_price_after_vat: Decimal,
}

impl LineAmounts {
    pub fn compute(line: &LineItem) -> Self {
        let q = line.quantity;
        let upb = line.unit_price_before_vat;

        let rebated_unit_price = upb * (Decimal::ONE - line.rebate_percent / HUNDRED);
        let line_base_after_rebate = rebated_unit_price * q;
        let unit_vat = rebated_unit_price * (line.vat_rate_percent / HUNDRED);
        let line_vat_amount = unit_vat * q;

        Self {
            price_before_vat: upb * q,
            rebated_unit_price,
            line_base_after_rebate,
            unit_vat,
            line_vat_amount,
            unit_price_after_vat: rebated_unit_price + unit_vat,
            line_price_after_vat: line_base_after_rebate + line_vat_amount,
        }
    }
}

/// The figures shown in the totals block of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsBreakdown {
    /// "Vrijednost bez PDV".
    pub price_before_vat: Decimal,
    /// "Iznos rabata", already negated when non-zero.
    pub rebate: Decimal,
    /// "Osnovica za stopu": price before VAT minus rebate.
    pub base: Decimal,
    /// "PDV po stopi".
    pub vat_amount: Decimal,
    /// Rate printed in the base/VAT labels.
    pub vat_rate: Decimal,
    /// "IZNOS ZA UPLATU": always the authority's `TotPrice`.
    pub total_payable: Decimal,
}

impl TotalsBreakdown {
    /// Running-sum breakdown over the lines.
    ///
    /// The rebate accumulates as a percentage of the subtotal *so far*, and
    /// VAT accumulates on (subtotal so far − rebate so far). Issued documents
    /// carry figures produced by this order, so it must not be replaced by
    /// a per-line sum.
    pub fn cumulative(invoice: &Invoice, rate_label: Decimal) -> Self {
        let mut price_before_vat = Decimal::ZERO;
        let mut rebate = Decimal::ZERO;
        let mut vat_amount = Decimal::ZERO;

        for line in invoice.lines() {
            price_before_vat += line.unit_price_before_vat * line.quantity;
            rebate += price_before_vat * (line.rebate_percent / HUNDRED);
            vat_amount += (price_before_vat - rebate) * (line.vat_rate_percent / HUNDRED);
        }

        let base = price_before_vat - rebate;
        if !rebate.is_zero() {
            rebate = -rebate;
        }

        Self {
            price_before_vat,
            rebate,
            base,
            vat_amount,
            vat_rate: rate_label,
            total_payable: invoice.total_price,
        }
    }

    /// Breakdown echoing the declared totals, with a zero rebate.
    pub fn declared(invoice: &Invoice) -> Self {
        Self {
            price_before_vat: invoice.total_price_without_vat,
            rebate: Decimal::ZERO,
            base: invoice.total_price_without_vat,
            vat_amount: invoice.total_vat_amount,
            vat_rate: invoice.document_vat_rate(),
            total_payable: invoice.total_price,
        }
    }
}

/// Comparison of the locally recomputed gross total against `TotPrice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Sum of per-line prices after VAT.
    pub computed_total: Decimal,
    /// The authority's `TotPrice`.
    pub declared_total: Decimal,
}

impl Reconciliation {
    pub fn difference(&self) -> Decimal {
        self.computed_total - self.declared_total
    }

    /// True when the two agree once rounded to cents.
    pub fn agrees(&self) -> bool {
        self.difference().abs() <= dec!(0.01)
    }
}

/// Recompute the gross total from the lines for diagnostics.
pub fn reconcile(invoice: &Invoice) -> Reconciliation {
    let computed_total = invoice
        .lines()
        .iter()
        .map(|l| LineAmounts::compute(l).line_price_after_vat)
        .sum();
    Reconciliation {
        computed_total,
        declared_total: invoice.total_price,
    }
}

fn bounded(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| v.abs() <= MAX_AMOUNT)
}

/// Running totals computed with overflow checks.
#[derive(Default)]
struct CheckedTotals {
    price_before_vat: Decimal,
    rebate: Decimal,
    vat_amount: Decimal,
    gross: Decimal,
}

impl CheckedTotals {
    /// Same operations, in the same order, as [`LineAmounts::compute`] and
    /// [`TotalsBreakdown::cumulative`]. `None` once any value overflows or
    /// exceeds [`MAX_AMOUNT`].
    fn push(&mut self, line: &LineItem) -> Option<()> {
        let q = line.quantity;
        let upb = line.unit_price_before_vat;
        let rebate_share = line.rebate_percent / HUNDRED;
        let vat_share = line.vat_rate_percent / HUNDRED;

        let price_before_vat = bounded(upb.checked_mul(q))?;
        let rebated = upb.checked_mul(Decimal::ONE - rebate_share)?;
        let base = bounded(rebated.checked_mul(q))?;
        let line_vat = bounded(rebated.checked_mul(vat_share)?.checked_mul(q))?;
        self.gross = bounded(self.gross.checked_add(base + line_vat))?;

        self.price_before_vat = bounded(self.price_before_vat.checked_add(price_before_vat))?;
        let step = self.price_before_vat.checked_mul(rebate_share)?;
        self.rebate = bounded(self.rebate.checked_add(step))?;
        let step = (self.price_before_vat - self.rebate).checked_mul(vat_share)?;
        self.vat_amount = bounded(self.vat_amount.checked_add(step))?;
        Some(())
    }
}

/// Reject invoices whose amounts would overflow the tax arithmetic.
///
/// Once this passes, [`LineAmounts::compute`], [`TotalsBreakdown::cumulative`]
/// and [`reconcile`] cannot overflow on `invoice`.
pub fn check_amounts(invoice: &Invoice) -> Result<(), FiskalError> {
    for (field, value) in [
        ("TotPrice", invoice.total_price),
        ("TotPriceWoVAT", invoice.total_price_without_vat),
        ("TotVATAmt", invoice.total_vat_amount),
    ] {
        if value.abs() > MAX_AMOUNT {
            return Err(FiskalError::invalid(field, format!("amount exceeds {MAX_AMOUNT}")));
        }
    }

    check_lines(invoice.lines())
}

fn check_lines(lines: &[LineItem]) -> Result<(), FiskalError> {
    let mut totals = CheckedTotals::default();
    for (i, line) in lines.iter().enumerate() {
        if totals.push(line).is_none() {
            return Err(FiskalError::invalid(
                format!("Items/I[{}]", i + 1),
                format!("amount exceeds {MAX_AMOUNT}"),
            ));
        }
    }
    Ok(())
}

/// Exemption notice for the document: last recognized line code wins.
pub fn exemption_notice(invoice: &Invoice) -> Option<ExemptionCode> {
    last_exemption(invoice.lines().iter().map(|l| l.exemption.as_deref()))
}
