// Login state for one user session.
//
// A `Session` is an explicit value owned by whoever serves the user: created
// at session start, cleared by `logout`, never shared between sessions.
use crate::dataset::Dataset;
use crate::error::{AccessError, EmptyResult, QueryError};
use crate::series::Series;
use crate::types::RankingEntry;
use std::collections::HashSet;
use tracing::{info, warn};

/// Valid school access codes plus the optional administrator code.
#[derive(Debug, Clone, Default)]
pub struct AccessRegistry {
    codes: HashSet<String>,
    master_code: Option<String>,
}

impl AccessRegistry {
    pub fn new<I, S>(codes: I, master_code: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AccessRegistry {
            codes: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            master_code: master_code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }

    fn is_master(&self, code: &str) -> bool {
        self.master_code.as_deref() == Some(code)
    }

    fn is_school(&self, code: &str) -> bool {
        self.codes.contains(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Logged in with the master code; sees every school.
    Admin,
    School { school_id: String, school_name: String },
}

/// Which schools an administrator wants to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolSelection {
    All,
    Named(String),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    principal: Option<Principal>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// A failed attempt leaves the session logged out.
    pub fn login(
        &mut self,
        code: &str,
        registry: &AccessRegistry,
        dataset: &Dataset,
    ) -> Result<&Principal, AccessError> {
        let code = code.trim();
        let principal = if code.is_empty() {
            self.principal = None;
            warn!("login rejected: empty access code");
            return Err(AccessError::UnknownCode);
        } else if registry.is_master(code) {
            Principal::Admin
        } else if registry.is_school(code) {
            let school_name = dataset.school_name(code).unwrap_or(code).to_string();
            Principal::School {
                school_id: code.to_string(),
                school_name,
            }
        } else {
            self.principal = None;
            warn!("login rejected: unknown access code");
            return Err(AccessError::UnknownCode);
        };
        info!(?principal, "login");
        let principal: &Principal = self.principal.insert(principal);
        Ok(principal)
    }

    pub fn logout(&mut self) {
        if self.principal.take().is_some() {
            info!("logout");
        }
    }

    /// Series the session may see.
    ///
    /// School users always get their own school; a `Named` selection of any
    /// other school is forbidden. Administrators get every school for `All`.
    pub fn visible_series(
        &self,
        dataset: &Dataset,
        selection: &SchoolSelection,
    ) -> Result<Vec<Series>, QueryError> {
        let principal = self.principal.as_ref().ok_or(AccessError::NotLoggedIn)?;
        match (principal, selection) {
            (Principal::Admin, SchoolSelection::All) => {
                let all = dataset.all_series();
                if all.is_empty() {
                    return Err(EmptyResult::School("*".into()).into());
                }
                Ok(all)
            }
            (Principal::Admin, SchoolSelection::Named(name)) => {
                let id = dataset
                    .school_id_for_name(name)
                    .ok_or_else(|| AccessError::UnknownSchool(name.clone()))?;
                Ok(vec![dataset.series(id)?])
            }
            (Principal::School { school_id, school_name }, selection) => {
                if let SchoolSelection::Named(name) = selection {
                    if name.trim() != school_name.as_str() {
                        return Err(AccessError::Forbidden(name.clone()).into());
                    }
                }
                Ok(vec![dataset.series(school_id)?])
            }
        }
    }

    pub fn ranking(&self, dataset: &Dataset, edition: i32) -> Result<Vec<RankingEntry>, QueryError> {
        if !self.is_authenticated() {
            return Err(AccessError::NotLoggedIn.into());
        }
        Ok(dataset.ranking(edition)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRow;

    fn dataset() -> Dataset {
        let rows: Vec<RawRow> = [
            ("23001", "Escola A", "2022", "60"),
            ("23001", "Escola A", "2023", "65"),
            ("23002", "Escola B", "2023", "70"),
        ]
        .iter()
        .map(|(id, name, ed, pct)| RawRow {
            line: 0,
            school_id: Some(id.to_string()),
            school_name: Some(name.to_string()),
            edition: Some(ed.to_string()),
            percentage: Some(pct.to_string()),
        })
        .collect();
        Dataset::from_rows(&rows).0
    }

    fn registry() -> AccessRegistry {
        AccessRegistry::new(["23001", " 23002 ", "23003"], Some("9999999".into()))
    }

    #[test]
    fn school_login_sees_only_its_school() {
        let ds = dataset();
        let mut session = Session::new();
        let p = session.login(" 23001 ", &registry(), &ds).unwrap().clone();
        assert_eq!(
            p,
            Principal::School { school_id: "23001".into(), school_name: "Escola A".into() }
        );
        let visible = session.visible_series(&ds, &SchoolSelection::All).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].len(), 2);
        assert_eq!(
            session.visible_series(&ds, &SchoolSelection::Named("Escola B".into())),
            Err(QueryError::Access(AccessError::Forbidden("Escola B".into())))
        );
    }

    #[test]
    fn admin_sees_all_or_selected() {
        let ds = dataset();
        let mut session = Session::new();
        assert_eq!(session.login("9999999", &registry(), &ds), Ok(&Principal::Admin));
        assert_eq!(session.visible_series(&ds, &SchoolSelection::All).unwrap().len(), 2);
        let b = session
            .visible_series(&ds, &SchoolSelection::Named("Escola B".into()))
            .unwrap();
        assert_eq!(b[0].school_id, "23002");
        assert!(matches!(
            session.visible_series(&ds, &SchoolSelection::Named("Escola Q".into())),
            Err(QueryError::Access(AccessError::UnknownSchool(_)))
        ));
    }

    #[test]
    fn failed_login_and_logout_clear_the_session() {
        let ds = dataset();
        let mut session = Session::new();
        session.login("23001", &registry(), &ds).unwrap();
        assert_eq!(session.login("nope", &registry(), &ds), Err(AccessError::UnknownCode));
        assert!(!session.is_authenticated());

        session.login("23002", &registry(), &ds).unwrap();
        session.logout();
        assert_eq!(session.principal(), None);
        assert_eq!(
            session.ranking(&ds, 2023),
            Err(QueryError::Access(AccessError::NotLoggedIn))
        );
    }

    #[test]
    fn known_code_without_results_is_empty_not_an_error() {
        let ds = dataset();
        let mut session = Session::new();
        session.login("23003", &registry(), &ds).unwrap();
        assert_eq!(
            session.visible_series(&ds, &SchoolSelection::All),
            Err(QueryError::Empty(EmptyResult::School("23003".into())))
        );
        assert_eq!(
            session.ranking(&ds, 2010),
            Err(QueryError::Empty(EmptyResult::Edition(2010)))
        );
    }

    #[test]
    fn master_code_is_optional() {
        let ds = dataset();
        let reg = AccessRegistry::new(["23001"], Some("  ".into()));
        let mut session = Session::new();
        assert_eq!(session.login("", &reg, &ds), Err(AccessError::UnknownCode));
    }

    #[test]
    fn blank_codes_never_authenticate() {
        let ds = dataset();
        let reg = AccessRegistry::new(["23001", "   ", ""], None);
        let mut session = Session::new();
        assert_eq!(session.login("", &reg, &ds), Err(AccessError::UnknownCode));
        assert_eq!(session.login("   ", &reg, &ds), Err(AccessError::UnknownCode));
        assert!(!session.is_authenticated());
        assert!(session.login("23001", &reg, &ds).is_ok());
    }
}
