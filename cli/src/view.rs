//! Text rendering of the bill screen.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use quickbill_core::{format_money, Bill, BillApi, BillStore, Field};

pub fn render<A: BillApi>(store: &BillStore<A>) -> String {
    let mut out = String::from("QuickBill Management\n\n");

    let form = store.form();
    for field in Field::ALL {
        out.push_str(&format!("  {:<13} {}\n", field.name(), form.get(field)));
    }
    out.push_str(&format!("  Preview Amount: {}\n\n", store.preview_total()));

    if !store.search_term().is_empty() {
        out.push_str(&format!("Filter: {}\n", store.search_term()));
    }
    if let Some(error) = store.error() {
        out.push_str(&format!("!! {error}\n"));
    }

    out.push_str("QuickBill — Bills\n");
    if store.bills().is_empty() {
        out.push_str("No bills found\n");
    } else {
        out.push_str(&format!("{}\n", bill_table(store.bills())));
    }
    out
}

pub fn bill_table(bills: &[Bill]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Customer"),
        Cell::new("Date"),
        Cell::new("Amount"),
        Cell::new("Tax"),
        Cell::new("Discount"),
        Cell::new("Total"),
    ]);

    for bill in bills {
        let id_cell = if bill.is_pending() {
            Cell::new(bill.id.to_string())
                .fg(Color::DarkGrey)
                .add_attribute(Attribute::Dim)
        } else {
            Cell::new(bill.id.to_string())
        };
        table.add_row(vec![
            id_cell,
            Cell::new(&bill.customer_name).add_attribute(Attribute::Bold),
            Cell::new(&bill.bill_date),
            money_cell(bill.amount),
            money_cell(bill.tax),
            money_cell(bill.discount),
            money_cell(bill.total()),
        ]);
    }
    table
}

fn money_cell(value: f64) -> Cell {
    Cell::new(format_money(value)).set_alignment(CellAlignment::Right)
}
