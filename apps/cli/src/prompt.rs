//! # Prompting
//!
//! Line-by-line input for sales and restocks, plus the parsers for the
//! non-interactive `--item` form.
//!
//! ## Sale Prompt Loop
//! ```text
//! Product ID (or 'done'): P001
//! Quantity: 9
//!   ✓ Vitamin C Serum (Garnier) - Bought: 9, Free: 3
//! Product ID (or 'done'): P404
//! Quantity: 1
//!   ✗ Product not found: P404           ← reported, loop continues
//! Product ID (or 'done'): done
//! ```
//!
//! Generic over `BufRead`/`Write` so tests drive it with byte buffers.

use std::io::{self, BufRead, Write};
use wecare_core::validation::parse_quantity;
use wecare_core::{Money, RestockLineRequest, SaleLineRequest, ValidationError};

/// Typed at the product-ID prompt to close the batch.
pub const DONE: &str = "done";

/// One answer to a line prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePrompt<T> {
    /// A well-formed line request.
    Line(T),
    /// Something that could not even be parsed; the loop re-prompts.
    Invalid(String),
    /// `done`, or end of input.
    Done,
}

/// Reads answers from `input`, writing prompts and feedback to `output`.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `label: ` and reads one trimmed line. `None` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until a non-blank answer is given. `None` at end of input.
    pub fn ask_required(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            match self.ask(label)? {
                Some(answer) if answer.is_empty() => writeln!(self.output, "  {} is required", label)?,
                other => return Ok(other),
            }
        }
    }

    /// Where command output goes.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prompts for one sale line.
    pub fn next_sale_line(&mut self) -> io::Result<LinePrompt<SaleLineRequest>> {
        let product_id = match self.ask("Product ID to sell (or 'done')")? {
            None => return Ok(LinePrompt::Done),
            Some(id) if id.eq_ignore_ascii_case(DONE) => return Ok(LinePrompt::Done),
            Some(id) => id,
        };

        let Some(quantity) = self.ask("Quantity to buy")? else {
            return Ok(LinePrompt::Done);
        };

        Ok(match parse_quantity(&quantity) {
            Ok(quantity) => LinePrompt::Line(SaleLineRequest::new(product_id, quantity)),
            Err(err) => LinePrompt::Invalid(err.to_string()),
        })
    }

    /// Prompts for one restock line. Blank name, brand or origin keeps the
    /// existing value of a known product.
    pub fn next_restock_line(&mut self) -> io::Result<LinePrompt<RestockLineRequest>> {
        let product_id = match self.ask("Product ID to restock (or 'done')")? {
            None => return Ok(LinePrompt::Done),
            Some(id) if id.eq_ignore_ascii_case(DONE) => return Ok(LinePrompt::Done),
            Some(id) => id,
        };

        let mut answers = Vec::with_capacity(5);
        for label in ["Product name", "Brand", "Quantity", "New cost price", "Country of origin"] {
            match self.ask(label)? {
                Some(answer) => answers.push(answer),
                None => return Ok(LinePrompt::Done),
            }
        }

        let [name, brand, quantity, cost, origin] = match <[String; 5]>::try_from(answers) {
            Ok(fields) => fields,
            Err(_) => return Ok(LinePrompt::Done),
        };

        Ok(match restock_request(&product_id, &name, &brand, &quantity, &cost, &origin) {
            Ok(request) => LinePrompt::Line(request),
            Err(err) => LinePrompt::Invalid(err.to_string()),
        })
    }
}

// =============================================================================
// --item Parsers
// =============================================================================

/// Parses a sale item given as `ID:QTY`, e.g. `P001:9`.
pub fn parse_sale_item(item: &str) -> Result<SaleLineRequest, ValidationError> {
    let (id, quantity) = item
        .split_once(':')
        .ok_or_else(|| ValidationError::invalid_format("item", format!("'{}' is not ID:QTY", item)))?;
    Ok(SaleLineRequest::new(id.trim(), parse_quantity(quantity)?))
}

/// Parses a restock item in catalog order:
/// `id, name, brand, quantity, cost, origin`.
///
/// Name, brand and origin may be left empty for a known product.
pub fn parse_restock_item(item: &str) -> Result<RestockLineRequest, ValidationError> {
    let fields: Vec<&str> = item.split(',').map(str::trim).collect();
    match fields.as_slice() {
        [id, name, brand, quantity, cost, origin] => restock_request(id, name, brand, quantity, cost, origin),
        _ => Err(ValidationError::invalid_format(
            "item",
            "expected 'id, name, brand, quantity, cost, origin'",
        )),
    }
}

fn restock_request(
    id: &str,
    name: &str,
    brand: &str,
    quantity: &str,
    cost: &str,
    origin: &str,
) -> Result<RestockLineRequest, ValidationError> {
    let quantity = parse_quantity(quantity)?;
    let cost = Money::parse(cost)?;
    Ok(RestockLineRequest::new(id.trim(), quantity, cost)
        .name(name.trim())
        .brand(brand.trim())
        .origin(origin.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_sale_lines_until_done() {
        let mut p = prompter("P001\n9\nP002\nlots\nDONE\n");

        assert_eq!(
            p.next_sale_line().unwrap(),
            LinePrompt::Line(SaleLineRequest::new("P001", 9))
        );
        assert!(matches!(p.next_sale_line().unwrap(), LinePrompt::Invalid(_)));
        assert_eq!(p.next_sale_line().unwrap(), LinePrompt::Done);

        let shown = String::from_utf8(p.output().clone()).unwrap();
        assert!(shown.starts_with("Product ID to sell (or 'done'): Quantity to buy: "));
    }

    #[test]
    fn test_end_of_input_closes_the_batch() {
        let mut p = prompter("P001\n");
        assert_eq!(p.next_sale_line().unwrap(), LinePrompt::Done);
        assert_eq!(p.next_restock_line().unwrap(), LinePrompt::Done);
    }

    #[test]
    fn test_restock_line_prompt() {
        let mut p = prompter("P099\nToner\nPlum\n50\n300\nIndia\n");
        let expected = RestockLineRequest::new("P099", 50, Money::from_major(300))
            .name("Toner")
            .brand("Plum")
            .origin("India");
        assert_eq!(p.next_restock_line().unwrap(), LinePrompt::Line(expected));
    }

    #[test]
    fn test_restock_bad_cost_is_invalid() {
        let mut p = prompter("P001\n\n\n5\nfree\n\n");
        assert!(matches!(p.next_restock_line().unwrap(), LinePrompt::Invalid(_)));
    }

    #[test]
    fn test_ask_required_repeats() {
        let mut p = prompter("\n  \nAsha Rao\n");
        assert_eq!(p.ask_required("Customer name").unwrap().as_deref(), Some("Asha Rao"));
        let shown = String::from_utf8(p.output().clone()).unwrap();
        assert_eq!(shown.matches("Customer name is required").count(), 2);
    }

    #[test]
    fn test_parse_sale_item() {
        assert_eq!(parse_sale_item("P001:9").unwrap(), SaleLineRequest::new("P001", 9));
        assert_eq!(parse_sale_item(" P002 : 3 ").unwrap(), SaleLineRequest::new("P002", 3));
        assert!(parse_sale_item("P001").is_err());
        assert!(parse_sale_item("P001:nine").is_err());
    }

    #[test]
    fn test_parse_restock_item() {
        let request = parse_restock_item("P001, , , 20, 900, ").unwrap();
        assert_eq!(request.quantity, 20);
        assert_eq!(request.cost_price, Money::from_major(900));

        assert!(parse_restock_item("P001, 20, 900").is_err());
        assert!(parse_restock_item("P001, a, b, x, 900, c").is_err());
    }
}
