#![allow(dead_code)]

use chrono::NaiveDate;
use fiskal::core::*;
use rust_decimal::Decimal;

pub fn line(name: &str, q: Decimal, upb: Decimal, r: Decimal, vr: Decimal) -> LineItem {
    LineItem {
        name: name.into(),
        code: None,
        unit: "kom".into(),
        quantity: q,
        unit_price_before_vat: upb,
        unit_price_after_vat: None,
        rebate_percent: r,
        rebate_reduces_base: None,
        price_before_vat: None,
        vat_rate_percent: vr,
        vat_amount: None,
        price_after_vat: None,
        exemption: None,
    }
}

pub fn exempt(mut line: LineItem, code: &str) -> LineItem {
    line.exemption = Some(code.into());
    line
}

pub fn invoice(lines: Vec<LineItem>) -> Invoice {
    let computed: Decimal = lines
        .iter()
        .map(|l| LineAmounts::compute(l).line_price_after_vat)
        .sum();
    let base: Decimal = lines
        .iter()
        .map(|l| LineAmounts::compute(l).line_base_after_rebate)
        .sum();
    Invoice {
        number: "xx123xx123/1/2024/yy456yy456".into(),
        order_number: "1".into(),
        issue_date_time: NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 20, 30)
            .unwrap(),
        payment_type: PaymentType::NonCash,
        iic: "5A1F0C2B9D3E4F5061728394A5B6C7D8".into(),
        business_unit_code: Some("xx123xx123".into()),
        tcr_code: Some("yy456yy456".into()),
        software_code: Some("ss123ss123".into()),
        total_price: computed.round_dp(2),
        total_price_without_vat: base.round_dp(2),
        total_vat_amount: (computed - base).round_dp(2),
        currency: None,
        seller: Seller {
            name: "Primjer DOO".into(),
            id_num: "02345678".into(),
            id_type: Some("TIN".into()),
            address: Some("Njegoseva 12".into()),
            town: Some("Podgorica".into()),
            country: Some("MNE".into()),
        },
        buyer: Some(Buyer {
            name: "Kupac DOO".into(),
            id_num: "03012345".into(),
            id_type: Some("TIN".into()),
            address: Some("Bulevar 1".into()),
            town: Some("Podgorica".into()),
            country: None,
        }),
        items: Items { lines },
        same_taxes: None,
    }
}

pub fn with_rate(mut invoice: Invoice, rate: Decimal) -> Invoice {
    invoice.same_taxes = Some(SameTaxes {
        entries: vec![SameTax {
            num_of_items: Some(invoice.lines().len() as u32),
            price_before_vat: Some(invoice.total_price_without_vat),
            vat_rate: Some(rate),
            exempt_from_vat: None,
            vat_amount: Some(invoice.total_vat_amount),
        }],
    });
    invoice
}

pub fn request(invoice: Invoice) -> InvoiceRequest {
    InvoiceRequest {
        header: None,
        invoice,
    }
}

pub fn issuer() -> IssuerConfig {
    IssuerConfig {
        name: "Primjer DOO".into(),
        address: "Njegoseva 12, Podgorica".into(),
        tin: "02345678".into(),
        vat: "30/31-01234-5".into(),
        phone: "+382 20 123 456".into(),
        fax: "+382 20 123 457".into(),
        bank_account: "510-12345-67".into(),
        environment: Environment::Test,
        fonts: FontConfig::default(),
    }
}

pub fn clients() -> ClientDirectory {
    ClientDirectory::new(vec![
        Client {
            tin: "03012345".into(),
            vat: "30/31-99999-1".into(),
            name: "Kupac DOO".into(),
        },
        Client {
            tin: "03012345".into(),
            vat: "duplicate".into(),
            name: "Kupac DOO (stari)".into(),
        },
    ])
}
