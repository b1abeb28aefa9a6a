//! The pure totals calculator.
//!
//! No side effects, no I/O. All arithmetic is `Decimal`; intermediate
//! values keep full precision and are rounded only by callers at the
//! persistence/display boundary.

use rust_decimal::Decimal;

use super::error::TotalsError;
use super::types::{DiscountType, DocumentTotals, LineItem, LineTotals, TaxAmount};

/// Stateless calculator for line and document totals.
pub struct TotalsCalculator;

const PERCENT_CAP: Decimal = Decimal::ONE_HUNDRED;

impl TotalsCalculator {
    /// Validate a single line item.
    ///
    /// Zero quantity or zero price is valid (the line contributes
    /// nothing); anything negative is rejected rather than clamped.
    /// The discount clamp in [`Self::line_totals`] is the one explicit
    /// clamping policy.
    ///
    /// # Errors
    ///
    /// Returns `TotalsError` naming the offending line and value.
    pub fn validate_item(item: &LineItem, line: usize) -> Result<(), TotalsError> {
        if item.name.trim().is_empty() {
            return Err(TotalsError::EmptyItemName { line });
        }
        if item.quantity < Decimal::ZERO {
            return Err(TotalsError::NegativeQuantity {
                line,
                quantity: item.quantity,
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(TotalsError::NegativeUnitPrice {
                line,
                unit_price: item.unit_price,
            });
        }
        if item.discount_value < Decimal::ZERO {
            return Err(TotalsError::NegativeDiscount {
                line,
                discount: item.discount_value,
            });
        }
        if item.discount_type == DiscountType::Percentage && item.discount_value > PERCENT_CAP {
            return Err(TotalsError::DiscountRateAboveCap {
                line,
                rate: item.discount_value,
            });
        }
        for component in &item.tax_components {
            if component.rate < Decimal::ZERO {
                return Err(TotalsError::NegativeTaxRate {
                    line,
                    name: component.name.clone(),
                    rate: component.rate,
                });
            }
            let duplicates = item
                .tax_components
                .iter()
                .filter(|c| c.name == component.name)
                .count();
            if duplicates > 1 {
                return Err(TotalsError::DuplicateTaxComponent {
                    line,
                    name: component.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Compute totals for a single validated line item.
    ///
    /// Pipeline: `subtotal = quantity × unit_price`; discount resolved
    /// from its type and clamped to `[0, subtotal]`; each tax component
    /// applies to the post-discount taxable amount.
    ///
    /// # Errors
    ///
    /// Returns `TotalsError` if the item fails validation.
    pub fn line_totals(item: &LineItem, line: usize) -> Result<LineTotals, TotalsError> {
        Self::validate_item(item, line)?;

        let subtotal = item.quantity * item.unit_price;

        let raw_discount = match item.discount_type {
            DiscountType::Fixed => item.discount_value,
            DiscountType::Percentage => subtotal * item.discount_value / PERCENT_CAP,
        };
        // Explicit policy: discount never exceeds the pre-tax line amount.
        let discount = raw_discount.clamp(Decimal::ZERO, subtotal);

        let taxable = subtotal - discount;

        let tax_amounts: Vec<TaxAmount> = item
            .tax_components
            .iter()
            .map(|c| TaxAmount {
                name: c.name.clone(),
                amount: taxable * c.rate / PERCENT_CAP,
            })
            .collect();

        let tax_sum: Decimal = tax_amounts.iter().map(|t| t.amount).sum();
        let total = taxable + tax_sum;

        Ok(LineTotals {
            subtotal,
            discount,
            taxable,
            tax_amounts,
            total,
        })
    }

    /// Compute per-line and document totals for a set of line items.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered, with its line
    /// index.
    pub fn document_totals(
        items: &[LineItem],
    ) -> Result<(Vec<LineTotals>, DocumentTotals), TotalsError> {
        let mut lines = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            lines.push(Self::line_totals(item, index)?);
        }

        let totals = DocumentTotals {
            subtotal: lines.iter().map(|l| l.subtotal).sum(),
            discount_total: lines.iter().map(|l| l.discount).sum(),
            tax_total: lines
                .iter()
                .flat_map(|l| l.tax_amounts.iter())
                .map(|t| t.amount)
                .sum(),
            grand_total: lines.iter().map(|l| l.total).sum(),
        };

        Ok((lines, totals))
    }
}
