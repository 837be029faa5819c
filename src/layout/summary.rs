use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Column, DocumentBuilder, LayoutDocument, PageSetup, Row, TextStyle, halves, labelled};
use crate::core::format::{format_amount, format_date};
use crate::core::{InvoiceRequest, IssuerConfig, LineAmounts};

/// Pre-aggregated figures for a periodic exemption report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub invoice_count: usize,
    pub base_before_rebate: Decimal,
    pub rebate: Decimal,
    pub base_after_rebate: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

impl ExemptionSummary {
    /// Aggregate the requests issued within `from..=to`.
    ///
    /// Line figures are recomputed per line; the total is the sum of the
    /// declared `TotPrice` values.
    pub fn from_requests<'a, I>(from: NaiveDate, to: NaiveDate, requests: I) -> Self
    where
        I: IntoIterator<Item = &'a InvoiceRequest>,
    {
        let mut summary = Self {
            from,
            to,
            invoice_count: 0,
            base_before_rebate: Decimal::ZERO,
            rebate: Decimal::ZERO,
            base_after_rebate: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        };

        for request in requests {
            let invoice = &request.invoice;
            let issued = invoice.issue_date();
            if issued < from || issued > to {
                continue;
            }
            summary.invoice_count += 1;
            for line in invoice.lines() {
                let a = LineAmounts::compute(line);
                summary.base_before_rebate += a.price_before_vat;
                summary.rebate += a.price_before_vat - a.line_base_after_rebate;
                summary.base_after_rebate += a.line_base_after_rebate;
                summary.vat_amount += a.line_vat_amount;
            }
            summary.total += invoice.total_price;
        }
        summary
    }
}

/// Assemble the exemption summary layout. There is no line table.
pub fn assemble_exemption_summary(issuer: &IssuerConfig, summary: &ExemptionSummary) -> LayoutDocument {
    let mut doc = DocumentBuilder::new(PageSetup::a4_portrait());

    doc.row(20.0, vec![Column::text(12, &issuer.name, TextStyle::TITLE)]);
    doc.row(
        4.0,
        halves(issuer.address.clone(), labelled("PIB:", &issuer.tin), TextStyle::BODY),
    );
    doc.row(
        4.0,
        halves(
            labelled("Tel:", &issuer.phone),
            labelled("PDV:", &issuer.vat),
            TextStyle::BODY,
        ),
    );
    doc.row(
        4.0,
        halves(
            labelled("Fax:", &issuer.fax),
            labelled("Z.R.:", &issuer.bank_account),
            TextStyle::BODY,
        ),
    );

    doc.line(6.0);

    let period = format!("{} - {}", format_date(summary.from), format_date(summary.to));
    doc.row(
        4.0,
        vec![Column::text(6, labelled("IZVESTAJ ZA PERIOD:", &period), TextStyle::BODY)],
    );
    doc.spacer(5.0);

    let line = |label: &str, value: String, style: TextStyle| {
        Row::new(
            4.0,
            vec![
                Column::text(3, label, style),
                Column::text(3, value, style),
                Column::space(6),
            ],
        )
    };
    let rows = vec![
        line(
            "Koliko ukupno faktura:",
            summary.invoice_count.to_string(),
            TextStyle::BODY,
        ),
        line(
            "Koliko osnovica prije rabata:",
            format_amount(summary.base_before_rebate),
            TextStyle::BODY,
        ),
        line("Koliko rabat:", format_amount(summary.rebate), TextStyle::BODY),
        line(
            "Koliko osnovica posle rabata:",
            format_amount(summary.base_after_rebate),
            TextStyle::BODY,
        ),
        line("Koliko PDV:", format_amount(summary.vat_amount), TextStyle::BODY),
        line(
            "Koliko ukupno sa PDV:",
            format_amount(summary.total),
            TextStyle::CAPTION,
        ),
    ];
    doc.row(32.0, vec![Column::stack(12, rows)]);

    tracing::debug!(invoices = summary.invoice_count, "assembled exemption summary layout");
    doc.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn summary() -> ExemptionSummary {
        ExemptionSummary {
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            invoice_count: 3,
            base_before_rebate: dec!(1000),
            rebate: dec!(50),
            base_after_rebate: dec!(950),
            vat_amount: dec!(0),
            total: dec!(950),
        }
    }

    #[test]
    fn layout_contents() {
        let issuer = IssuerConfig {
            name: "Primjer DOO".into(),
            tin: "02345678".into(),
            ..Default::default()
        };
        let doc = assemble_exemption_summary(&issuer, &summary());
        let texts = doc.texts();
        assert_eq!(texts[0], "Primjer DOO");
        assert!(texts.contains(&"PIB: 02345678"));
        assert!(texts.contains(&"IZVESTAJ ZA PERIOD: 2024-01-01 - 2024-01-31"));
        let count = texts.iter().position(|t| *t == "Koliko ukupno faktura:").unwrap();
        assert_eq!(texts[count + 1], "3");
        assert!(texts.contains(&"1000.00"));
        assert!(texts.contains(&"950.00"));
        assert!(doc.table().is_none());
    }
}
