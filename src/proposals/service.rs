use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::models::CatalogItem;
use crate::pricing::{
    Aggregator, PricingDefaultsStore, PricingEngine, ProposalTerms, ProposalTotals,
    SelectedLineItem, SurchargeEngine,
};
use crate::proposals::{
    CreateProposalRequest, Proposal, ProposalError, ProposalItemRequest, ProposalPreviewRequest,
    ProposalPreviewResponse, ProposalResponse, ProposalsRepository, ProposalTermsRequest,
};

/// Service for contract-proposal business logic
///
/// Mirrors the quote service: resolve the selection against the catalog,
/// merge the configured rates (per-km rate, visit-count discount) into the
/// engine terms, run the pure engine, persist the result.
#[derive(Clone)]
pub struct ProposalService {
    pool: PgPool,
    proposals_repo: ProposalsRepository,
    defaults_store: Arc<PricingDefaultsStore>,
}

impl ProposalService {
    /// Create a new ProposalService
    pub fn new(
        pool: PgPool,
        proposals_repo: ProposalsRepository,
        defaults_store: Arc<PricingDefaultsStore>,
    ) -> Self {
        Self {
            pool,
            proposals_repo,
            defaults_store,
        }
    }

    async fn build_selection(
        &self,
        items: &[ProposalItemRequest],
    ) -> Result<(Vec<CatalogItem>, Vec<SelectedLineItem>), ProposalError> {
        if items.is_empty() {
            return Err(ProposalError::ValidationError(
                "Proposal must contain at least one item".to_string(),
            ));
        }

        for item in items {
            if item.quantity <= 0 {
                return Err(ProposalError::InvalidQuantity(format!(
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
                .ok_or(ProposalError::CatalogItemNotFound(request.catalog_item_id))?;

            // Proposals price equipment service only: no labor component
            selection.push(SelectedLineItem {
                item_id: catalog_item.id,
                quantity: request.quantity,
                unit_price: catalog_item.unit_rate,
                labor_rate: rust_decimal::Decimal::ZERO,
            });
        }

        Ok((catalog, selection))
    }

    /// Merge request terms with the configured per-km rate and the
    /// visit-count discount table
    async fn resolve_terms(
        &self,
        request: &ProposalTermsRequest,
    ) -> Result<ProposalTerms, ProposalError> {
        let defaults = self.defaults_store.defaults().await?;
        let visit_discount_percent = self
            .defaults_store
            .visit_discount_percent(request.visit_count)
            .await?;

        Ok(ProposalTerms {
            distance_km: request.distance_km,
            visit_count: request.visit_count,
            rate_per_km: defaults.rate_per_km,
            visit_discount_percent,
        })
    }

    /// Compute proposal totals without persisting anything
    pub async fn preview(
        &self,
        request: ProposalPreviewRequest,
    ) -> Result<ProposalPreviewResponse, ProposalError> {
        let (catalog, selection) = self.build_selection(&request.items).await?;
        let terms = self.resolve_terms(&request.terms).await?;

        let pricing = PricingEngine::price_proposal(&catalog, &selection, &terms);

        Ok(ProposalPreviewResponse {
            items: pricing.items,
            totals: pricing.totals,
        })
    }

    /// Create a new proposal
    pub async fn create_proposal(
        &self,
        request: CreateProposalRequest,
    ) -> Result<Proposal, ProposalError> {
        if !db::client_exists(&self.pool, request.client_id).await? {
            return Err(ProposalError::ClientNotFound(request.client_id));
        }

        let (catalog, selection) = self.build_selection(&request.items).await?;
        let terms = self.resolve_terms(&request.terms).await?;

        let pricing = PricingEngine::price_proposal(&catalog, &selection, &terms);

        let items_json = serde_json::to_value(&pricing.items).unwrap_or_default();
        let terms_json = serde_json::to_value(&terms).unwrap_or_default();

        let proposal = self
            .proposals_repo
            .create(request.client_id, items_json, terms_json, &pricing.totals)
            .await?;

        tracing::info!(
            "Created proposal {} for client {} (grand total {})",
            proposal.id,
            proposal.client_id,
            proposal.grand_total
        );

        Ok(proposal)
    }

    /// Get a proposal by ID
    pub async fn get_proposal(&self, proposal_id: Uuid) -> Result<ProposalResponse, ProposalError> {
        let proposal = self
            .proposals_repo
            .find_by_id(proposal_id)
            .await?
            .ok_or(ProposalError::NotFound)?;

        Ok(Self::to_response(proposal))
    }

    /// List proposals with an optional client filter
    pub async fn list_proposals(
        &self,
        client_id: Option<i32>,
    ) -> Result<Vec<ProposalResponse>, ProposalError> {
        let proposals = self.proposals_repo.find_all(client_id).await?;

        Ok(proposals.into_iter().map(Self::to_response).collect())
    }

    /// Rebuild a response from a stored proposal, recomputing the totals
    /// from the persisted payload
    pub fn to_response(proposal: Proposal) -> ProposalResponse {
        let items = proposal.line_items();
        let terms = proposal.proposal_terms();

        let equipment = Aggregator::totals(&items);
        let per_visit = Aggregator::scale_for_visits(&equipment, terms.visit_count);
        let totals: ProposalTotals = SurchargeEngine::proposal_totals(&per_visit, &terms);

        ProposalResponse {
            id: proposal.id,
            client_id: proposal.client_id,
            items,
            totals,
            created_at: proposal.created_at,
            updated_at: proposal.updated_at,
        }
    }
}
