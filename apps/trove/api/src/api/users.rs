use axum::Router;
use database::TransactionManager;
use domain_users::{SeaOrmUserRepository, UserService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = SeaOrmUserRepository::new(state.db.clone());
    let transactions = TransactionManager::new(state.db.clone());
    let service = UserService::new(repository, transactions, state.signer.clone())
        .with_token_ttl(state.config.jwt.token_ttl());

    handlers::router(service, state.signer.clone())
}
