//! Basket pricing: turns requested (price, quantity) pairs into frozen
//! ticket lines and an exact total.

use rust_decimal::Decimal;

use crate::domain::catalog::CatalogRepository;
use crate::domain::reservation::TicketLine;
use crate::domain::{DomainError, DomainResult};

/// One requested entry of a basket, as received from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketRequest {
    pub price_id: Option<i32>,
    pub quantity: i64,
}

/// Priced basket ready to be stored on a reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedBasket {
    pub lines: Vec<TicketLine>,
    pub total_amount: Decimal,
}

pub struct PricingSnapshotter<'a> {
    catalog: &'a dyn CatalogRepository,
}

impl<'a> PricingSnapshotter<'a> {
    pub fn new(catalog: &'a dyn CatalogRepository) -> Self {
        Self { catalog }
    }

    /// Resolve every requested price and freeze it. Nothing is written.
    pub async fn snapshot(&self, requests: &[TicketRequest]) -> DomainResult<PricedBasket> {
        let entries = requests
            .iter()
            .map(|r| match (r.price_id, u32::try_from(r.quantity)) {
                (Some(id), Ok(qty)) if qty > 0 => Ok((id, qty)),
                _ => Err(DomainError::validation(
                    "each ticket must have a price id and a positive quantity",
                )),
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let mut lines = Vec::with_capacity(entries.len());
        let mut total_amount = Decimal::ZERO;

        for (price_id, quantity) in entries {
            let price = self
                .catalog
                .price(price_id)
                .await?
                .ok_or_else(|| DomainError::not_found(format!("price {} not found", price_id)))?;

            let line = TicketLine::snapshot(&price, quantity);
            total_amount += line.subtotal;
            lines.push(line);
        }

        Ok(PricedBasket { lines, total_amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{dec, repos, seed_price};

    fn req(price_id: i32, quantity: i64) -> TicketRequest {
        TicketRequest {
            price_id: Some(price_id),
            quantity,
        }
    }

    #[tokio::test]
    async fn total_is_exact_sum_of_subtotals() {
        let repos = repos().await;
        let adult = seed_price(&repos, "Adult", "ADULT", "25.00").await;
        let child = seed_price(&repos, "Child", "CHILD", "15.00").await;

        let basket = PricingSnapshotter::new(repos.catalog())
            .snapshot(&[req(adult.id, 2), req(child.id, 1)])
            .await
            .unwrap();

        assert_eq!(basket.lines.len(), 2);
        assert_eq!(basket.total_amount, dec("65.00"));
        let sum: Decimal = basket.lines.iter().map(|l| l.subtotal).sum();
        assert_eq!(sum, basket.total_amount);
    }

    #[tokio::test]
    async fn cents_do_not_drift() {
        let repos = repos().await;
        let p = seed_price(&repos, "Senior", "SENIOR", "19.99").await;

        let basket = PricingSnapshotter::new(repos.catalog())
            .snapshot(&[req(p.id, 3)])
            .await
            .unwrap();

        assert_eq!(basket.total_amount, dec("59.97"));
    }

    #[tokio::test]
    async fn non_positive_quantity_or_missing_id_is_rejected() {
        let repos = repos().await;
        let p = seed_price(&repos, "Adult", "ADULT", "25.00").await;
        let pricing = PricingSnapshotter::new(repos.catalog());

        for bad in [
            req(p.id, 0),
            req(p.id, -1),
            TicketRequest {
                price_id: None,
                quantity: 1,
            },
        ] {
            let err = pricing.snapshot(&[bad]).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn unknown_price_is_not_found() {
        let repos = repos().await;
        let err = PricingSnapshotter::new(repos.catalog())
            .snapshot(&[req(99, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(ref m) if m == "price 99 not found"));
    }
}
