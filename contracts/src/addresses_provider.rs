//! Registry holding the current lending pool address.

use odra::prelude::*;

use crate::mock_errors::MockError;

#[odra::module]
pub struct AddressesProvider {
    admin: Var<Address>,
    router: Var<Option<Address>>,
}

#[odra::module]
impl AddressesProvider {
    pub fn init(&mut self, admin: Address) {
        self.admin.set(admin);
        self.router.set(None);
    }

    /// Point the registry at a (new) router (admin only)
    pub fn set_router(&mut self, router: Address) {
        self.require_admin();
        self.router.set(Some(router));
    }

    pub fn get_router(&self) -> Option<Address> {
        self.router.get().flatten()
    }

    pub fn get_admin(&self) -> Option<Address> {
        self.admin.get()
    }

    fn require_admin(&self) {
        let caller = self.env().caller();
        if self.admin.get() != Some(caller) {
            self.env().revert(MockError::Unauthorized);
        }
    }
}
