use rust_decimal_macros::dec;

use super::{
    Align, Column, DocumentBuilder, ImageBlock, ImageFormat, LayoutDocument, PageSetup, Rgb, Row,
    Table, TextStyle, halves, labelled,
};
use crate::core::format::{format_amount, format_date, format_percent, format_rate};
use crate::core::{
    ExemptionCode, Invoice, LineAmounts, LineItem, RenderContext, TotalsBreakdown,
    exemption_notice,
};

const LATE_PAYMENT_NOTICE: &str =
    "U slucaju ne placanja u dogovorenom roku obracunava se zatezna kamata.";
const COURT_NOTICE: &str = "U slucaju spora nadlezan je Privredni sud Podgorica";
const STAMP_LINE: &str = "M.P. _________________________";
const TOTALS_RULE: &str =
    "-----------------------------------------------------------------------------------";

/// Which invoice template to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateVariant {
    /// Eleven-column line table, contact rows in the header, rebate and VAT
    /// recomputed from the lines, exemption notice taken from line codes.
    #[default]
    Detailed,
    /// Eight-column line table with the declared post-VAT prices, compact
    /// header, totals echoed from the request, Article 17 notice at 0% VAT.
    Simplified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineColumn {
    Ordinal,
    Name,
    Unit,
    Quantity,
    UnitPriceBeforeVat,
    PriceBeforeVat,
    Rebate,
    VatRate,
    VatAmount,
    UnitPriceAfterVat,
    PriceAfterVat,
    DeclaredUnitPriceAfterVat,
    DeclaredPriceAfterVat,
}

impl LineColumn {
    fn header(self) -> &'static str {
        match self {
            Self::Ordinal => "Rb",
            Self::Name => "NAZIV PROIZVODA/USLUGE",
            Self::Unit => "JM",
            Self::Quantity => "Kolicina",
            Self::UnitPriceBeforeVat => "      Cijena      bez PDV",
            Self::PriceBeforeVat => "    Vrijednost     bez PDV",
            Self::Rebate => "Rabat %",
            Self::VatRate => "PDV Stopa",
            Self::VatAmount => "PDV Iznos",
            Self::UnitPriceAfterVat | Self::DeclaredUnitPriceAfterVat => {
                "      Cijena       sa PDV"
            }
            Self::PriceAfterVat | Self::DeclaredPriceAfterVat => "    Vrijednost    sa PDV",
        }
    }

    fn cell(self, index: usize, line: &LineItem, amounts: &LineAmounts) -> String {
        match self {
            Self::Ordinal => (index + 1).to_string(),
            Self::Name => line.name.clone(),
            Self::Unit => line.unit.clone(),
            Self::Quantity => format_amount(line.quantity),
            Self::UnitPriceBeforeVat => format_amount(line.unit_price_before_vat),
            Self::PriceBeforeVat => format_amount(amounts.price_before_vat),
            Self::Rebate => format_percent(line.rebate_percent),
            Self::VatRate => format_percent(line.vat_rate_percent),
            Self::VatAmount => format_amount(amounts.line_vat_amount),
            Self::UnitPriceAfterVat => format_amount(amounts.unit_price_after_vat),
            Self::PriceAfterVat => format_amount(amounts.line_price_after_vat),
            Self::DeclaredUnitPriceAfterVat => format_amount(
                line.unit_price_after_vat
                    .unwrap_or(amounts.unit_price_after_vat),
            ),
            Self::DeclaredPriceAfterVat => format_amount(
                line.price_after_vat
                    .unwrap_or(amounts.line_price_after_vat),
            ),
        }
    }
}

/// Variant-specific settings. Everything else is shared.
struct TemplateConfig {
    /// Line table columns with their grid weights.
    columns: &'static [(LineColumn, u8)],
    /// Phone and fax rows under the seller name.
    contact_rows: bool,
    /// Recompute rebate and VAT from the lines instead of echoing totals.
    rebate_breakdown: bool,
}

static DETAILED: TemplateConfig = TemplateConfig {
    columns: &[
        (LineColumn::Ordinal, 1),
        (LineColumn::Name, 2),
        (LineColumn::Unit, 1),
        (LineColumn::Quantity, 1),
        (LineColumn::UnitPriceBeforeVat, 1),
        (LineColumn::PriceBeforeVat, 1),
        (LineColumn::Rebate, 1),
        (LineColumn::VatRate, 1),
        (LineColumn::VatAmount, 1),
        (LineColumn::UnitPriceAfterVat, 1),
        (LineColumn::PriceAfterVat, 1),
    ],
    contact_rows: true,
    rebate_breakdown: true,
};

static SIMPLIFIED: TemplateConfig = TemplateConfig {
    columns: &[
        (LineColumn::Ordinal, 1),
        (LineColumn::Name, 3),
        (LineColumn::Unit, 1),
        (LineColumn::Quantity, 1),
        (LineColumn::UnitPriceBeforeVat, 1),
        (LineColumn::VatRate, 1),
        (LineColumn::DeclaredUnitPriceAfterVat, 2),
        (LineColumn::DeclaredPriceAfterVat, 2),
    ],
    contact_rows: false,
    rebate_breakdown: false,
};

impl TemplateVariant {
    fn config(self) -> &'static TemplateConfig {
        match self {
            Self::Detailed => &DETAILED,
            Self::Simplified => &SIMPLIFIED,
        }
    }

    /// Figures for the totals block.
    pub fn totals(self, invoice: &Invoice) -> TotalsBreakdown {
        if self.config().rebate_breakdown {
            // the detailed template always labels the base "stopu 21%"
            TotalsBreakdown::cumulative(invoice, dec!(21))
        } else {
            TotalsBreakdown::declared(invoice)
        }
    }

    /// The legal notice printed under "NAPOMENA:", if any.
    pub fn notice(self, invoice: &Invoice) -> Option<String> {
        let code = if self.config().rebate_breakdown {
            exemption_notice(invoice)
        } else if invoice.document_vat_rate().is_zero() {
            Some(ExemptionCode::Cl17)
        } else {
            None
        };
        code.map(|c| c.notice())
    }
}

/// Build the line-item table for `variant`.
pub fn line_table(invoice: &Invoice, variant: TemplateVariant) -> Table {
    let columns = variant.config().columns;
    let rows = invoice
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let amounts = LineAmounts::compute(line);
            columns
                .iter()
                .map(|(col, _)| col.cell(i, line, &amounts))
                .collect()
        })
        .collect();

    Table {
        header: columns.iter().map(|(c, _)| c.header().to_string()).collect(),
        rows,
        grid: columns.iter().map(|(_, w)| *w).collect(),
        header_size: 6.0,
        content_size: 6.0,
        align: Align::Center,
        alternate_background: Some(Rgb::ALTERNATE_ROW),
        header_gap: 2.0,
    }
}

/// Assemble the invoice layout.
///
/// `qr_png_base64` is the encoded verification QR code; it is placed left
/// of the totals block.
pub fn assemble_invoice(
    ctx: &RenderContext<'_>,
    variant: TemplateVariant,
    qr_png_base64: String,
) -> LayoutDocument {
    let config = variant.config();
    let invoice = &ctx.request.invoice;
    let seller = &invoice.seller;
    let issuer = ctx.issuer;
    let buyer = ctx.buyer();

    let mut doc = DocumentBuilder::new(PageSetup::a4_portrait());

    // Seller header
    doc.row(20.0, vec![Column::text(12, &seller.name, TextStyle::TITLE)]);
    doc.row(
        4.0,
        halves(
            seller.address.clone().unwrap_or_default(),
            labelled("PIB:", &seller.id_num),
            TextStyle::BODY,
        ),
    );
    if config.contact_rows {
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
    } else {
        doc.row(
            4.0,
            halves(
                labelled("PDV:", &issuer.vat),
                labelled("Z.R.:", &issuer.bank_account),
                TextStyle::BODY,
            ),
        );
    }

    doc.line(6.0);

    // Invoice data on the left, buyer on the right
    doc.row(
        4.0,
        halves(
            labelled("Broj racuna:", &invoice.number),
            "KUPAC".to_string(),
            TextStyle::CAPTION,
        ),
    );
    doc.row(
        4.0,
        halves(
            labelled("Interni br:", &ctx.internal_number),
            buyer.name.clone(),
            TextStyle::CAPTION,
        ),
    );
    doc.row(
        4.0,
        halves(
            labelled("Datum prometa dobara:", &format_date(invoice.issue_date())),
            labelled("Adresa:", &buyer.postal_line()),
            TextStyle::BODY,
        ),
    );
    doc.row(
        4.0,
        halves(
            labelled("Valuta:", invoice.currency_code()),
            labelled("PIB:", &buyer.id_num),
            TextStyle::BODY,
        ),
    );
    doc.row(
        4.0,
        halves(
            labelled("Nacin placanja:", invoice.payment_type.label()),
            labelled("PDV:", &ctx.buyer_client().vat),
            TextStyle::BODY,
        ),
    );

    doc.line(4.0);
    doc.table(line_table(invoice, variant));
    doc.line(0.0);
    doc.spacer(4.0);

    // QR code next to the totals
    let totals = variant.totals(invoice);
    let qr = ImageBlock {
        base64: qr_png_base64,
        format: ImageFormat::Png,
        percent: 100.0,
        center: true,
    };
    doc.row(
        32.0,
        vec![
            Column::image(2, qr),
            Column::space(4),
            Column::stack(6, totals_rows(&totals)),
        ],
    );

    doc.spacer(4.0);
    doc.row(
        4.0,
        vec![
            Column::text(1, "JIKR:", TextStyle::BODY),
            Column::text(11, &ctx.response.fic, TextStyle::BODY),
        ],
    );
    doc.row(
        4.0,
        vec![
            Column::text(1, "IKOF:", TextStyle::BODY),
            Column::text(11, &invoice.iic, TextStyle::BODY_WRAP),
        ],
    );

    doc.spacer(4.0);
    doc.row(4.0, vec![Column::text(6, "NAPOMENA:", TextStyle::CAPTION)]);
    if let Some(notice) = variant.notice(invoice) {
        doc.row(4.0, vec![Column::text(12, notice, TextStyle::BODY)]);
        doc.spacer(2.0);
    }
    doc.row(4.0, vec![Column::text(12, LATE_PAYMENT_NOTICE, TextStyle::BODY)]);
    doc.row(4.0, vec![Column::text(12, COURT_NOTICE, TextStyle::BODY)]);
    doc.row(
        4.0,
        vec![
            Column::space(6),
            Column::text(6, STAMP_LINE, TextStyle::BODY_RIGHT),
        ],
    );

    tracing::debug!(?variant, iic = %invoice.iic, "assembled invoice layout");
    doc.build()
}

fn totals_rows(t: &TotalsBreakdown) -> Vec<Row> {
    let rate = format_rate(t.vat_rate);
    let rule = || Row::new(4.0, vec![Column::text(12, TOTALS_RULE, TextStyle::BODY_RIGHT)]);
    let pair = |label: String, value: String, style: TextStyle| Row::new(4.0, halves(label, value, style));

    vec![
        pair(
            "Vrijednost bez PDV:".into(),
            format_amount(t.price_before_vat),
            TextStyle::BODY_RIGHT,
        ),
        pair(
            "Iznos rabata:".into(),
            format_amount(t.rebate),
            TextStyle::BODY_RIGHT,
        ),
        rule(),
        pair(
            format!("Osnovica za stopu {rate}%:"),
            format_amount(t.base),
            TextStyle::BODY_RIGHT,
        ),
        pair(
            format!("PDV po stopi {rate}%:"),
            format_amount(t.vat_amount),
            TextStyle::BODY_RIGHT,
        ),
        rule(),
        pair(
            "IZNOS ZA UPLATU:".into(),
            format_amount(t.total_payable),
            TextStyle::CAPTION_RIGHT,
        ),
    ]
}
