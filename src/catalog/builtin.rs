//! Built-in items and scanbooks.

use super::{CatalogItem, Scanbook, UnitOfMeasure};
use crate::gs1::{Gs1Fields, NetWeight, WeightUnit};
use crate::symbol::Symbology;

pub(super) fn items() -> Vec<CatalogItem> {
    vec![
        // Basic grocery
        CatalogItem::new("Cola 12oz Can", "049000000443"),
        CatalogItem::new("Potato Chips 8oz", "028400001878"),
        CatalogItem::new("Spearmint Gum", "012000000140"),
        CatalogItem::new("Sparkling Water 1L", "012000001291"),
        // Produce by weight
        CatalogItem::new("Bananas", "4011").unit(UnitOfMeasure::Lb),
        CatalogItem::new("Gala Apples", "4133").unit(UnitOfMeasure::Lb),
        CatalogItem::new("Deli Ham", "DELI-HAM")
            .unit(UnitOfMeasure::Kg)
            .gs1(Gs1Fields {
                gtin: Some("00012345000010".into()),
                sell_by_date: Some("2026-11-02".into()),
                net_weight: Some(NetWeight {
                    value: 0.454,
                    unit: WeightUnit::Kg,
                }),
                ..Default::default()
            }),
        CatalogItem::new("Ground Beef", "BEEF-80")
            .unit(UnitOfMeasure::Lb)
            .gs1(Gs1Fields {
                gtin: Some("00028400012348".into()),
                sell_by_date: Some("2026-10-21".into()),
                net_weight: Some(NetWeight {
                    value: 1.25,
                    unit: WeightUnit::Lb,
                }),
                ..Default::default()
            }),
        // Dated perishables
        CatalogItem::new("Whole Milk 1gal", "070470000329").gs1(Gs1Fields {
            gtin: Some("00070470000329".into()),
            best_before_date: Some("2026-10-25".into()),
            batch: Some("L2291A".into()),
            ..Default::default()
        }),
        CatalogItem::new("Greek Yogurt", "085000001028")
            .symbology(Symbology::Gs1Qr)
            .gs1(Gs1Fields {
                expiration_date: Some("2026-10-18".into()),
                batch: Some("YG-0447".into()),
                ..Default::default()
            }),
        // Age restricted
        CatalogItem::new("Lager 6pk", "018600000016").unit(UnitOfMeasure::Pack),
        CatalogItem::new("Red Wine 750ml", "078742000213"),
        // Coupons and tickets
        CatalogItem::new("$1 Off Chips Coupon", "CPN-CHIPS1")
            .symbology(Symbology::Code128)
            .barcode("CPN-CHIPS1-0100"),
        CatalogItem::new("Loyalty Card", "LOYALTY-DEMO")
            .symbology(Symbology::Qr)
            .barcode("LOYALTY:4000123456"),
        CatalogItem::new("Return Receipt", "RCPT-1042")
            .symbology(Symbology::Pdf417)
            .barcode("RCPT|STORE-17|LANE-3|TXN-1042|2026-10-12"),
        // Case pick with serial
        CatalogItem::new("Paper Towels Case", "CASE-PT12")
            .unit(UnitOfMeasure::Case)
            .gs1(Gs1Fields {
                gtin: Some("10012345000017".into()),
                serial: Some("SN000981".into()),
                production_date: Some("2026-09-30".into()),
                ..Default::default()
            }),
    ]
}

pub(super) fn scanbooks() -> Vec<Scanbook> {
    vec![
        Scanbook {
            id: "basic-sale".into(),
            title: "Basic Sale".into(),
            description: "Ring up a few packaged items and tender cash.".into(),
            steps: vec![
                "Sign on to the register".into(),
                "Scan each item once".into(),
                "Check the subtotal against the shelf prices".into(),
                "Tender cash and verify change".into(),
            ],
            skus: vec![
                "049000000443".into(),
                "028400001878".into(),
                "012000000140".into(),
                "012000001291".into(),
            ],
        },
        Scanbook {
            id: "weighted-items".into(),
            title: "Weighted Items".into(),
            description: "Produce on the scale and pre-weighed deli packs.".into(),
            steps: vec![
                "Key or scan the produce code and weigh it".into(),
                "Scan the deli and meat labels".into(),
                "Confirm the net weight is taken from the label".into(),
            ],
            skus: vec![
                "4011".into(),
                "4133".into(),
                "DELI-HAM".into(),
                "BEEF-80".into(),
            ],
        },
        Scanbook {
            id: "dated-perishables".into(),
            title: "Dated Perishables".into(),
            description: "Best-before and expiration dates in 2D symbols.".into(),
            steps: vec![
                "Scan the milk and yogurt labels".into(),
                "Expired items should be blocked or flagged".into(),
                "Check the batch number appears on the receipt".into(),
            ],
            skus: vec![
                "070470000329".into(),
                "085000001028".into(),
                "BEEF-80".into(),
            ],
        },
        Scanbook {
            id: "age-restricted".into(),
            title: "Age Restricted".into(),
            description: "Alcohol sale that requires an ID check.".into(),
            steps: vec![
                "Scan the lager".into(),
                "Register should prompt for date of birth".into(),
                "Decline once, then approve and scan the wine".into(),
            ],
            skus: vec!["018600000016".into(), "078742000213".into()],
        },
        Scanbook {
            id: "coupons-and-returns".into(),
            title: "Coupons and Returns".into(),
            description: "Non-product symbols: coupons, loyalty and receipts.".into(),
            steps: vec![
                "Scan the chips, then the coupon".into(),
                "Scan the loyalty card before tender".into(),
                "Start a return and scan the receipt".into(),
            ],
            skus: vec![
                "028400001878".into(),
                "CPN-CHIPS1".into(),
                "LOYALTY-DEMO".into(),
                "RCPT-1042".into(),
            ],
        },
        Scanbook {
            id: "receiving".into(),
            title: "Receiving".into(),
            description: "Case labels with serial numbers at the back door.".into(),
            steps: vec![
                "Open a receiving document".into(),
                "Scan the case label".into(),
                "Confirm serial and production date are recorded".into(),
            ],
            skus: vec!["CASE-PT12".into()],
        },
    ]
}
