/// Role ids as issued in access tokens by the HR auth service.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    /// Ids the auth service hands to machine clients are not accepted here.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Edits salary structures and runs payroll for the whole company.
    pub fn manages_payroll(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_hr_manage_payroll() {
        assert!(Role::from_id(1).unwrap().manages_payroll());
        assert!(Role::from_id(2).unwrap().manages_payroll());
        assert!(!Role::from_id(3).unwrap().manages_payroll());
        assert_eq!(Role::from_id(4), None);
    }
}
