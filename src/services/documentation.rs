use utoipa::OpenApi;

/// Aggregated OpenAPI specification for the FOB contest service.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::submit_entry,
        crate::routes::public::my_entry,
        crate::routes::public::list_systems,
        crate::routes::public::suggest_systems,
        crate::routes::public::get_prizes,
        crate::routes::public::get_rules,
        crate::routes::public::get_status,
        crate::routes::public::get_history,
        crate::routes::public::get_winners,
        crate::routes::public::get_time,
        crate::routes::public::get_help,
        crate::routes::admin::end_contest,
        crate::routes::admin::open_contest,
        crate::routes::admin::new_contest,
        crate::routes::admin::set_deadline,
        crate::routes::admin::clear_deadline,
        crate::routes::admin::set_prizes,
        crate::routes::admin::list_entries,
        crate::routes::admin::backup_database,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::contest::SubmitEntryRequest,
            crate::dto::contest::EntryResponse,
            crate::dto::contest::SystemsResponse,
            crate::dto::contest::PrizesResponse,
            crate::dto::contest::RulesSection,
            crate::dto::contest::RulesResponse,
            crate::dto::contest::ContestStatusResponse,
            crate::dto::contest::ContestSummary,
            crate::dto::contest::UtcNowResponse,
            crate::dto::contest::CommandHelp,
            crate::dto::contest::HelpResponse,
            crate::dto::admin::EndContestRequest,
            crate::dto::admin::EndContestResponse,
            crate::dto::admin::NewContestRequest,
            crate::dto::admin::NewContestResponse,
            crate::dto::admin::SetDeadlineRequest,
            crate::dto::admin::DeadlineResponse,
            crate::dto::admin::SetPrizesRequest,
            crate::dto::admin::EntryListResponse,
            crate::dto::admin::BackupResponse,
            crate::dto::admin::ActionResponse,
            crate::error::ErrorBody,
            crate::state::lifecycle::ContestPhase,
            crate::dao::models::ContestId,
            crate::dao::models::UserId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "contest", description = "Participant commands and public contest state"),
        (name = "admin", description = "Contest lifecycle management"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_command() {
        let doc = ApiDoc::openapi();
        for path in [
            "/contest/entries",
            "/contest/systems/suggest",
            "/contest/help",
            "/admin/contest/end",
            "/admin/deadline",
            "/healthcheck",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn every_operation_carries_its_handler_summary() {
        let doc = ApiDoc::openapi();
        for (path, item) in &doc.paths.paths {
            let operations = [&item.get, &item.put, &item.post, &item.delete];
            for operation in operations.into_iter().flatten() {
                let summary = operation.summary.as_deref().unwrap_or_default();
                assert!(!summary.is_empty(), "{path} has no summary");
            }
        }

        let deadline = doc.paths.paths["/admin/deadline"].put.as_ref().unwrap();
        assert!(
            deadline
                .summary
                .as_deref()
                .is_some_and(|summary| summary.contains("entry deadline"))
        );
    }
}
