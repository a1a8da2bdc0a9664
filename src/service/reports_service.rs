use crate::aggregates::customers::{customer_summaries, CustomerSummary};
use crate::aggregates::sales::{sales_summary, SalesSummary};
use crate::aggregates::withdrawals::{
    checked_withdrawal_minor, withdrawal_summary, WithdrawalSummary,
};
use crate::domain::effects::{Effect, WriteOutcome};
use crate::domain::error::{api_err, internal, ApiError};
use crate::domain::seller::SellerSession;
use crate::domain::withdrawal::{WithdrawalRecord, WithdrawalRequest};
use crate::repo::orders_repo::OrdersRepo;
use crate::repo::withdrawals_repo::WithdrawalsRepo;
use axum::http::StatusCode;
use sqlx::PgPool;

pub const RECENT_SALES: usize = 20;

#[derive(Clone)]
pub struct ReportsService {
    pub pool: PgPool,
}

impl ReportsService {
    pub async fn sales(&self, session: &SellerSession) -> Result<SalesSummary, ApiError> {
        let orders = OrdersRepo::list_for_seller(&self.pool, session.seller_id())
            .await
            .map_err(internal)?;
        Ok(sales_summary(&orders, RECENT_SALES))
    }

    pub async fn customers(&self, session: &SellerSession) -> Result<Vec<CustomerSummary>, ApiError> {
        let orders = OrdersRepo::list_for_seller(&self.pool, session.seller_id())
            .await
            .map_err(internal)?;
        Ok(customer_summaries(&orders))
    }

    pub async fn withdrawals(&self, session: &SellerSession) -> Result<WithdrawalSummary, ApiError> {
        let orders = OrdersRepo::list_for_seller(&self.pool, session.seller_id())
            .await
            .map_err(internal)?;
        let withdrawals = WithdrawalsRepo::list_for_seller(&self.pool, session.seller_id())
            .await
            .map_err(internal)?;
        Ok(withdrawal_summary(&orders, &withdrawals))
    }

    pub async fn request_withdrawal(
        &self,
        session: &SellerSession,
        req: WithdrawalRequest,
    ) -> Result<WriteOutcome<WithdrawalRecord>, ApiError> {
        let seller_id = session.seller_id();

        let mut tx = self.pool.begin().await.map_err(|e| internal(e.into()))?;
        WithdrawalsRepo::lock_seller_tx(&mut tx, seller_id)
            .await
            .map_err(internal)?;

        let orders = OrdersRepo::list_for_seller(tx.as_mut(), seller_id)
            .await
            .map_err(internal)?;
        let withdrawals = WithdrawalsRepo::list_for_seller(tx.as_mut(), seller_id)
            .await
            .map_err(internal)?;
        let summary = withdrawal_summary(&orders, &withdrawals);

        let requested_minor = checked_withdrawal_minor(req.amount, summary.available_balance_minor)
            .map_err(|e| api_err(StatusCode::BAD_REQUEST, "INVALID_AMOUNT", &e.to_string()))?;

        let record = WithdrawalsRepo::insert_pending_tx(&mut tx, seller_id, requested_minor)
            .await
            .map_err(internal)?;
        tx.commit().await.map_err(|e| internal(e.into()))?;

        tracing::info!(
            seller_id = %seller_id,
            withdrawal_id = %record.withdrawal_id,
            amount_minor = requested_minor,
            "withdrawal requested"
        );
        Ok(WriteOutcome::new(record, vec![Effect::Withdrawals]))
    }
}
