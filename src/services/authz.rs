//! Authorization engine and query scoping
//!
//! Every protected operation is decided here, in one table, instead of ad hoc
//! role comparisons spread over the handlers. Default is deny; admin is
//! evaluated first and bypasses ownership checks everywhere except the
//! wishlist, which is strictly owner-only.

use crate::{
    error::{AppError, AppResult},
    models::user::{Principal, Role},
};

/// A protected operation, carrying the resource ownership fields the rules
/// compare against the principal.
#[derive(Debug)]
pub enum Action<'a> {
    ListAllUsers,
    UpdateUserRole,
    /// Owner-scoped listing view; `owner` is the requested owner filter
    ListAllBooks { owner: Option<&'a str> },
    UpdateBook { seller: &'a str },
    DeleteBook,
    CreateBook,
    /// Read, write, or delete a wishlist entry owned by `owner`
    TouchWishlist { owner: &'a str },
    ReadOrders { buyer: Option<&'a str>, seller: Option<&'a str> },
    CreateOrder { buyer: &'a str },
    UpdateOrder { buyer: &'a str, seller: &'a str },
    /// Start checkout for an order whose buyer is `buyer`
    PayOrder { buyer: &'a str },
    ReadInvoices { buyer: Option<&'a str> },
}

/// Authorization decision
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AppError::Authorization(reason.to_string())),
        }
    }
}

fn same_principal(principal: &str, other: &str) -> bool {
    principal.eq_ignore_ascii_case(other)
}

/// Decide whether `principal` may perform `action`. Anything the table does
/// not explicitly grant is denied.
pub fn authorize(principal: &Principal, action: &Action<'_>) -> Decision {
    let email = principal.email.as_str();
    let admin = principal.role == Role::Admin;
    let librarian = principal.role == Role::Librarian;

    match action {
        Action::ListAllUsers | Action::UpdateUserRole => {
            if admin {
                Decision::Allow
            } else {
                Decision::Deny("Administrator privileges required")
            }
        }

        Action::ListAllBooks { owner } => {
            if admin {
                return Decision::Allow;
            }
            if !librarian {
                return Decision::Deny("Librarian privileges required");
            }
            match owner {
                // A librarian with no explicit filter is scoped to themself
                None => Decision::Allow,
                Some(owner) if same_principal(email, owner) => Decision::Allow,
                Some(_) => Decision::Deny("Librarians may only view their own listings"),
            }
        }

        Action::UpdateBook { seller } => {
            if admin {
                Decision::Allow
            } else if librarian && same_principal(email, seller) {
                Decision::Allow
            } else {
                Decision::Deny("Only the selling librarian or an admin may update a listing")
            }
        }

        Action::DeleteBook => {
            if admin {
                Decision::Allow
            } else {
                Decision::Deny("Administrator privileges required")
            }
        }

        Action::CreateBook => {
            if librarian {
                Decision::Allow
            } else {
                Decision::Deny("Librarian privileges required")
            }
        }

        // Owner-only, deliberately with no admin override
        Action::TouchWishlist { owner } => {
            if same_principal(email, owner) {
                Decision::Allow
            } else {
                Decision::Deny("Wishlist entries belong to their owner")
            }
        }

        Action::ReadOrders { buyer, seller } => {
            if admin {
                return Decision::Allow;
            }
            match (buyer, seller) {
                (None, None) => Decision::Allow, // scoped to own orders
                (Some(b), _) if same_principal(email, b) => Decision::Allow,
                (_, Some(s)) if same_principal(email, s) => Decision::Allow,
                _ => Decision::Deny("Orders are only visible to their buyer or seller"),
            }
        }

        Action::CreateOrder { buyer } => {
            if same_principal(email, buyer) {
                Decision::Allow
            } else {
                Decision::Deny("Orders may only be created for oneself")
            }
        }

        Action::UpdateOrder { buyer, seller } => {
            if admin || same_principal(email, buyer) || same_principal(email, seller) {
                Decision::Allow
            } else {
                Decision::Deny("Only the buyer, the seller, or an admin may update an order")
            }
        }

        Action::PayOrder { buyer } => {
            if same_principal(email, buyer) {
                Decision::Allow
            } else {
                Decision::Deny("Checkout may only be started by the order's buyer")
            }
        }

        Action::ReadInvoices { buyer } => {
            if admin {
                return Decision::Allow;
            }
            match buyer {
                None => Decision::Allow, // scoped to own invoices
                Some(b) if same_principal(email, b) => Decision::Allow,
                Some(_) => Decision::Deny("Invoices are only visible to their buyer"),
            }
        }
    }
}

/// Visible scope for listing queries. Derived from the principal's role once
/// `authorize` has allowed the action, and applied to the storage filter
/// itself so nothing outside the scope leaks through counts or errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookScope {
    All,
    Seller(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Participant(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceScope {
    All,
    Buyer(String),
}

pub fn book_scope(principal: &Principal) -> BookScope {
    if principal.is_admin() {
        BookScope::All
    } else {
        BookScope::Seller(principal.email.clone())
    }
}

pub fn order_scope(principal: &Principal) -> OrderScope {
    if principal.is_admin() {
        OrderScope::All
    } else {
        OrderScope::Participant(principal.email.clone())
    }
}

pub fn invoice_scope(principal: &Principal) -> InvoiceScope {
    if principal.is_admin() {
        InvoiceScope::All
    } else {
        InvoiceScope::Buyer(principal.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(email: &str, role: Role) -> Principal {
        Principal {
            email: email.to_string(),
            role,
        }
    }

    fn buyer() -> Principal {
        principal("buyer@x.com", Role::Buyer)
    }

    fn librarian() -> Principal {
        principal("l@x.com", Role::Librarian)
    }

    fn admin() -> Principal {
        principal("root@x.com", Role::Admin)
    }

    #[test]
    fn user_management_is_admin_only() {
        for action in [Action::ListAllUsers, Action::UpdateUserRole] {
            assert_eq!(authorize(&admin(), &action), Decision::Allow);
            assert!(matches!(authorize(&buyer(), &action), Decision::Deny(_)));
            assert!(matches!(authorize(&librarian(), &action), Decision::Deny(_)));
        }
    }

    #[test]
    fn librarian_sees_only_own_listings() {
        let action = Action::ListAllBooks { owner: Some("other@x.com") };
        assert!(matches!(authorize(&librarian(), &action), Decision::Deny(_)));
        assert_eq!(authorize(&admin(), &action), Decision::Allow);
        assert_eq!(
            authorize(&librarian(), &Action::ListAllBooks { owner: Some("l@x.com") }),
            Decision::Allow
        );
        assert_eq!(
            authorize(&librarian(), &Action::ListAllBooks { owner: None }),
            Decision::Allow
        );
        assert!(matches!(
            authorize(&buyer(), &Action::ListAllBooks { owner: None }),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn book_update_requires_ownership_unless_admin() {
        let foreign = Action::UpdateBook { seller: "s@x.com" };
        assert!(matches!(authorize(&librarian(), &foreign), Decision::Deny(_)));
        assert_eq!(authorize(&admin(), &foreign), Decision::Allow);

        let own = Action::UpdateBook { seller: "l@x.com" };
        assert_eq!(authorize(&librarian(), &own), Decision::Allow);
        // A buyer never updates listings, even their "own" email
        assert!(matches!(
            authorize(&principal("s@x.com", Role::Buyer), &foreign),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn ownership_comparison_ignores_case() {
        let own = Action::UpdateBook { seller: "L@X.com" };
        assert_eq!(authorize(&librarian(), &own), Decision::Allow);
    }

    #[test]
    fn book_delete_is_admin_only() {
        assert_eq!(authorize(&admin(), &Action::DeleteBook), Decision::Allow);
        assert!(matches!(authorize(&librarian(), &Action::DeleteBook), Decision::Deny(_)));
    }

    #[test]
    fn book_create_is_librarian_only() {
        assert_eq!(authorize(&librarian(), &Action::CreateBook), Decision::Allow);
        assert!(matches!(authorize(&buyer(), &Action::CreateBook), Decision::Deny(_)));
        assert!(matches!(authorize(&admin(), &Action::CreateBook), Decision::Deny(_)));
    }

    #[test]
    fn wishlist_has_no_admin_override() {
        let action = Action::TouchWishlist { owner: "buyer@x.com" };
        assert_eq!(authorize(&buyer(), &action), Decision::Allow);
        assert!(matches!(authorize(&admin(), &action), Decision::Deny(_)));
        assert!(matches!(authorize(&librarian(), &action), Decision::Deny(_)));
    }

    #[test]
    fn foreign_order_filter_is_denied() {
        let action = Action::ReadOrders { buyer: Some("other@x.com"), seller: None };
        assert!(matches!(authorize(&buyer(), &action), Decision::Deny(_)));
        assert_eq!(authorize(&admin(), &action), Decision::Allow);
    }

    #[test]
    fn order_read_allows_either_side() {
        assert_eq!(
            authorize(&buyer(), &Action::ReadOrders { buyer: Some("buyer@x.com"), seller: None }),
            Decision::Allow
        );
        assert_eq!(
            authorize(&buyer(), &Action::ReadOrders { buyer: None, seller: Some("buyer@x.com") }),
            Decision::Allow
        );
        assert_eq!(
            authorize(&buyer(), &Action::ReadOrders { buyer: None, seller: None }),
            Decision::Allow
        );
    }

    #[test]
    fn order_create_is_self_only() {
        assert_eq!(
            authorize(&buyer(), &Action::CreateOrder { buyer: "buyer@x.com" }),
            Decision::Allow
        );
        assert!(matches!(
            authorize(&admin(), &Action::CreateOrder { buyer: "buyer@x.com" }),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn order_update_allows_participants_and_admin() {
        let action = Action::UpdateOrder { buyer: "buyer@x.com", seller: "l@x.com" };
        assert_eq!(authorize(&buyer(), &action), Decision::Allow);
        assert_eq!(authorize(&librarian(), &action), Decision::Allow);
        assert_eq!(authorize(&admin(), &action), Decision::Allow);
        assert!(matches!(
            authorize(&principal("other@x.com", Role::Buyer), &action),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn checkout_is_buyer_only() {
        let action = Action::PayOrder { buyer: "buyer@x.com" };
        assert_eq!(authorize(&buyer(), &action), Decision::Allow);
        assert!(matches!(authorize(&admin(), &action), Decision::Deny(_)));
    }

    #[test]
    fn invoices_are_buyer_scoped() {
        assert_eq!(
            authorize(&buyer(), &Action::ReadInvoices { buyer: Some("buyer@x.com") }),
            Decision::Allow
        );
        assert!(matches!(
            authorize(&buyer(), &Action::ReadInvoices { buyer: Some("other@x.com") }),
            Decision::Deny(_)
        ));
        assert_eq!(
            authorize(&admin(), &Action::ReadInvoices { buyer: Some("other@x.com") }),
            Decision::Allow
        );
    }

    #[test]
    fn scopes_narrow_to_principal_for_non_admins() {
        assert_eq!(book_scope(&librarian()), BookScope::Seller("l@x.com".to_string()));
        assert_eq!(book_scope(&admin()), BookScope::All);
        assert_eq!(
            order_scope(&buyer()),
            OrderScope::Participant("buyer@x.com".to_string())
        );
        assert_eq!(invoice_scope(&buyer()), InvoiceScope::Buyer("buyer@x.com".to_string()));
        assert_eq!(invoice_scope(&admin()), InvoiceScope::All);
    }

    #[test]
    fn deny_reason_maps_to_authorization_error() {
        let err = Decision::Deny("nope").into_result().unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }
}
