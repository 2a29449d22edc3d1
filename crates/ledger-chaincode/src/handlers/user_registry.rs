//! # User Registry
//!
//! Create/read/update/delete of user profile documents.
//!
//! - User ids are unique and lower-cased; every string field is stored
//!   lower-cased.
//! - Updates are merge-patches. A blank argument means "keep", so a field
//!   cannot be cleared to empty through an update.
//! - Queries go through the [`QueryResultAssembler`].

use super::{exact_args, require_non_empty};
use crate::domain::{UserId, UserPatch, UserRecord, USER_DOC_TYPE};
use crate::errors::ChaincodeError;
use crate::ports::WorldState;
use crate::query::QueryResultAssembler;
use serde_json::json;
use tracing::{debug, info};

/// User registry contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserRegistry {
    assembler: QueryResultAssembler,
}

impl UserRegistry {
    /// Registry whose queries use `assembler`.
    #[must_use]
    pub const fn new(assembler: QueryResultAssembler) -> Self {
        Self { assembler }
    }

    /// `addUser(userId, userName, userAddress, gender, userType)`.
    pub fn create(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "addUser";
        let [user_id, name, address, gender, user_type] = exact_args::<5>(FN, args)?;
        require_non_empty(FN, "userId", user_id)?;
        require_non_empty(FN, "userName", name)?;
        require_non_empty(FN, "userAddress", address)?;
        require_non_empty(FN, "gender", gender)?;
        require_non_empty(FN, "userType", user_type)?;

        let id = UserId::parse(user_id)?;
        if state.get_state(id.as_str())?.is_some() {
            return Err(ChaincodeError::DuplicateKey(format!("user '{id}'")));
        }

        let record = UserRecord::new(&id, name, address, gender, user_type);
        state.put_state(id.as_str(), record.to_bytes()?)?;

        info!(user_id = %id, "User created");
        Ok(Vec::new())
    }

    /// `deleteUser(userId)`.
    pub fn delete(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let [user_id] = exact_args::<1>("deleteUser", args)?;
        let id = UserId::parse(user_id)?;

        load_user(state, &id)?;
        state.del_state(id.as_str())?;

        info!(user_id = %id, "User deleted");
        Ok(Vec::new())
    }

    /// `updateUser(userId, userName?, userAddress?, gender?, userType?)`.
    ///
    /// At least one optional field must be present. Blank fields are kept.
    /// Nothing is written when the merge changes nothing.
    pub fn update(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "updateUser";
        if !(2..=5).contains(&args.len()) {
            return Err(ChaincodeError::argument(format!(
                "{FN}: incorrect number of arguments, expecting 2 to 5, got {}",
                args.len()
            )));
        }

        let id = UserId::parse(&args[0])?;
        let patch = UserPatch::from_args(&args[1..]);
        let mut record = load_user(state, &id)?;

        if !patch.apply(&mut record) {
            debug!(user_id = %id, "Update left record unchanged");
            return Ok(Vec::new());
        }
        state.put_state(id.as_str(), record.to_bytes()?)?;

        info!(user_id = %id, "User updated");
        Ok(Vec::new())
    }

    /// `queryUserByUserId(userId)`: JSON array of matching documents.
    pub fn query_by_user_id(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let [user_id] = exact_args::<1>("queryUserByUserId", args)?;
        let id = UserId::parse(user_id)?;
        let query = user_selector(&id);
        self.assembler.assemble(state, &query)
    }

    /// `queryUsers(selector)`: the selector is passed to the store unchecked.
    pub fn query_ad_hoc(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let [query] = exact_args::<1>("queryUsers", args)?;
        self.assembler.assemble(state, query)
    }
}

/// Selector document matching the user record with `id`.
#[must_use]
pub fn user_selector(id: &UserId) -> String {
    json!({
        "selector": {
            "docType": USER_DOC_TYPE,
            "userid": id.as_str(),
        }
    })
    .to_string()
}

fn load_user(state: &dyn WorldState, id: &UserId) -> Result<UserRecord, ChaincodeError> {
    let bytes = state
        .get_state(id.as_str())?
        .ok_or_else(|| ChaincodeError::NotFound(format!("user '{id}'")))?;
    UserRecord::decode(id.as_str(), &bytes)
}

// =============================================================================
// TESTS
// =============================================================================
