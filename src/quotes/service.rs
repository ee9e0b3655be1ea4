use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::models::CatalogItem;
use crate::pricing::{
    AdjustedLineItem, Aggregator, BudgetTotals, PricingDefaultsStore, PricingEngine,
    SelectedLineItem, SurchargeEngine,
};
use crate::quotes::{
    CreateQuoteRequest, Quote, QuoteError, QuoteItemRequest, QuotePreviewRequest,
    QuotePreviewResponse, QuoteResponse, QuotesRepository, QuoteStatus, StatusMachine,
};

/// Service for quote business logic
///
/// Gathers the engine inputs (catalog snapshot, configured defaults), runs
/// the pricing engine, and persists/returns the result. All computation
/// happens in the pure engine; this layer only does I/O around it.
#[derive(Clone)]
pub struct QuoteService {
    pool: PgPool,
    quotes_repo: QuotesRepository,
    defaults_store: Arc<PricingDefaultsStore>,
}

impl QuoteService {
    /// Create a new QuoteService
    pub fn new(
        pool: PgPool,
        quotes_repo: QuotesRepository,
        defaults_store: Arc<PricingDefaultsStore>,
    ) -> Self {
        Self {
            pool,
            quotes_repo,
            defaults_store,
        }
    }

    /// Resolve the requested items against the catalog
    ///
    /// Returns the full catalog (category completeness is checked against
    /// all of it) and the selection with rates snapshotted from the catalog.
    async fn build_selection(
        &self,
        items: &[QuoteItemRequest],
    ) -> Result<(Vec<CatalogItem>, Vec<SelectedLineItem>), QuoteError> {
        if items.is_empty() {
            return Err(QuoteError::ValidationError(
                "Quote must contain at least one item".to_string(),
            ));
        }

        for item in items {
            if item.quantity <= 0 {
                return Err(QuoteError::InvalidQuantity(format!(
                    "Quantity must be positive, got {}",
                    item.quantity
                )));
            }
        }

        let catalog = db::fetch_catalog(&self.pool).await?;
        let by_id: HashMap<i32, &CatalogItem> =
            catalog.iter().map(|item| (item.id, item)).collect();

        let mut selection = Vec::with_capacity(items.len());
        for request in items {
            let catalog_item = by_id
                .get(&request.catalog_item_id)
                .ok_or(QuoteError::CatalogItemNotFound(request.catalog_item_id))?;

            selection.push(SelectedLineItem {
                item_id: catalog_item.id,
                quantity: request.quantity,
                unit_price: catalog_item.unit_rate,
                labor_rate: catalog_item.labor_rate,
            });
        }

        Ok((catalog, selection))
    }

    /// Compute quote totals without persisting anything
    pub async fn preview(
        &self,
        request: QuotePreviewRequest,
    ) -> Result<QuotePreviewResponse, QuoteError> {
        let (catalog, selection) = self.build_selection(&request.items).await?;
        let defaults = self.defaults_store.defaults().await?;
        let terms = request.terms.into_budget_terms(&defaults);

        let pricing = PricingEngine::price_budget(&catalog, &selection, &terms);

        Ok(QuotePreviewResponse {
            items: pricing.items,
            totals: pricing.totals,
        })
    }

    /// Create a new quote
    ///
    /// Prices the selection and persists the serialized items, the merged
    /// terms and a totals snapshot. The quote starts in draft status.
    pub async fn create_quote(&self, request: CreateQuoteRequest) -> Result<Quote, QuoteError> {
        if !db::client_exists(&self.pool, request.client_id).await? {
            return Err(QuoteError::ClientNotFound(request.client_id));
        }

        let (catalog, selection) = self.build_selection(&request.items).await?;
        let defaults = self.defaults_store.defaults().await?;
        let terms = request.terms.into_budget_terms(&defaults);

        let pricing = PricingEngine::price_budget(&catalog, &selection, &terms);

        let items_json = serde_json::to_value(&pricing.items).unwrap_or_default();
        let terms_json = serde_json::to_value(&terms).unwrap_or_default();

        let quote = self
            .quotes_repo
            .create(
                request.client_id,
                QuoteStatus::Draft,
                items_json,
                terms_json,
                &pricing.totals,
            )
            .await?;

        tracing::info!(
            "Created quote {} for client {} (grand total {})",
            quote.id,
            quote.client_id,
            quote.grand_total
        );

        Ok(quote)
    }

    /// Get a quote by ID
    pub async fn get_quote(&self, quote_id: Uuid) -> Result<QuoteResponse, QuoteError> {
        let quote = self
            .quotes_repo
            .find_by_id(quote_id)
            .await?
            .ok_or(QuoteError::NotFound)?;

        Ok(Self::to_response(quote))
    }

    /// List quotes with optional client and status filters
    pub async fn list_quotes(
        &self,
        client_id: Option<i32>,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<QuoteResponse>, QuoteError> {
        let quotes = self.quotes_repo.find_all(client_id, status).await?;

        Ok(quotes.into_iter().map(Self::to_response).collect())
    }

    /// Update quote status
    ///
    /// The transition is validated by the status machine before the write.
    pub async fn update_status(
        &self,
        quote_id: Uuid,
        new_status: QuoteStatus,
    ) -> Result<QuoteResponse, QuoteError> {
        let quote = self
            .quotes_repo
            .find_by_id(quote_id)
            .await?
            .ok_or(QuoteError::NotFound)?;

        StatusMachine::transition(quote.status, new_status)
            .map_err(QuoteError::InvalidTransition)?;

        let updated = self.quotes_repo.update_status(quote_id, new_status).await?;

        Ok(Self::to_response(updated))
    }

    /// Invoice-adjusted line items for a persisted quote
    ///
    /// Recomputes the totals from the stored payload, then prorates the
    /// material subtotal back onto the lines.
    pub async fn invoice_items(&self, quote_id: Uuid) -> Result<Vec<AdjustedLineItem>, QuoteError> {
        let quote = self
            .quotes_repo
            .find_by_id(quote_id)
            .await?
            .ok_or(QuoteError::NotFound)?;

        let items = quote.line_items();
        let totals = Self::recompute_totals(&quote);

        Ok(PricingEngine::invoice_items(&items, totals.material_subtotal))
    }

    /// Rebuild a response from a stored quote
    ///
    /// Totals are recomputed from the persisted payload rather than read
    /// back from the snapshot columns; the snapshot exists for reporting,
    /// the engine stays the single source of truth.
    pub fn to_response(quote: Quote) -> QuoteResponse {
        let items = quote.line_items();
        let totals = Self::recompute_totals(&quote);

        QuoteResponse {
            id: quote.id,
            client_id: quote.client_id,
            status: quote.status,
            items,
            totals,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }

    fn recompute_totals(quote: &Quote) -> BudgetTotals {
        let items = quote.line_items();
        let terms = quote.budget_terms();
        let equipment = Aggregator::totals(&items);

        SurchargeEngine::budget_totals(&equipment, &terms)
    }
}
