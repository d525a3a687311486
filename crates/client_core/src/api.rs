use std::sync::Arc;

use shared::{
    domain::{EmployeeFields, EmployeeId},
    protocol::{
        parse_ack_response, parse_list_response, AckResponse, DebugAction, EmployeeList,
        ListResponse, Route,
    },
};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    transport::{RawResponse, Transport},
};

/// Typed calls for every backend operation.
#[derive(Clone)]
pub struct RosterApi {
    transport: Arc<dyn Transport>,
}

impl RosterApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_employees(&self) -> Result<EmployeeList, ClientError> {
        let route = Route::list_employees();
        let raw = self.transport.send(&route, None).await?;
        match parse_list_response(&raw.body) {
            Ok(ListResponse::Employees(list)) if raw.is_success() => Ok(list),
            Ok(ListResponse::Employees(_)) => Err(ClientError::Status {
                route: route.to_string(),
                status: raw.status,
            }),
            Ok(ListResponse::Error(err)) => Err(ClientError::Backend(err)),
            Err(err) => Err(unparsed(&route, &raw, err)),
        }
    }

    pub async fn add_employee(&self, fields: &EmployeeFields) -> Result<Option<String>, ClientError> {
        self.acknowledge(Route::add_employee(), Some(fields)).await
    }

    pub async fn edit_employee(
        &self,
        id: EmployeeId,
        fields: &EmployeeFields,
    ) -> Result<Option<String>, ClientError> {
        self.acknowledge(Route::edit_employee(id), Some(fields)).await
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> Result<Option<String>, ClientError> {
        self.acknowledge(Route::delete_employee(id), None).await
    }

    pub async fn run_debug(&self, action: DebugAction) -> Result<Option<String>, ClientError> {
        self.acknowledge(Route::debug(action), None).await
    }

    async fn acknowledge(
        &self,
        route: Route,
        form: Option<&EmployeeFields>,
    ) -> Result<Option<String>, ClientError> {
        let raw = self.transport.send(&route, form).await?;
        match parse_ack_response(&raw.body) {
            Ok(AckResponse::Ok { message }) if raw.is_success() => {
                info!(%route, "roster: backend acknowledged request");
                Ok(message)
            }
            Ok(AckResponse::Ok { .. }) => Err(ClientError::Status {
                route: route.to_string(),
                status: raw.status,
            }),
            Ok(AckResponse::Error(err)) => {
                warn!(%route, error = %err, "roster: backend rejected request");
                Err(ClientError::Backend(err))
            }
            Err(err) => Err(unparsed(&route, &raw, err)),
        }
    }
}

// A body we cannot read is reported by status when the status already explains it.
fn unparsed(route: &Route, raw: &RawResponse, err: shared::error::ProtocolError) -> ClientError {
    if raw.is_success() {
        ClientError::Protocol(err)
    } else {
        ClientError::Status {
            route: route.to_string(),
            status: raw.status,
        }
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
