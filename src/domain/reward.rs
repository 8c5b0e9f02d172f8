use serde::Serialize;

/// An entry in the static reward catalog. Rewards live outside the ledger:
/// redemption only debits points, no inventory is tracked.
#[derive(Debug, Clone, Serialize)]
pub struct Reward {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points_cost: i64,
}

/// The campus reward catalog, fixed at build time.
pub fn reward_catalog() -> &'static [Reward] {
    const CATALOG: [Reward; 5] = [
        Reward {
            id: "coffee",
            title: "Free Coffee",
            description: "Complimentary coffee at Campus Coffee Shop",
            points_cost: 200,
        },
        Reward {
            id: "cafeteria-10",
            title: "10% Off Cafeteria",
            description: "10% discount on your next cafeteria meal",
            points_cost: 150,
        },
        Reward {
            id: "bookstore-500",
            title: "500.00 Bookstore Voucher",
            description: "Redeem for books and stationery",
            points_cost: 400,
        },
        Reward {
            id: "lunch",
            title: "Free Lunch Ticket",
            description: "One complimentary lunch at any campus vendor",
            points_cost: 500,
        },
        Reward {
            id: "store-20",
            title: "20% Off Store",
            description: "Discount on your next campus store purchase",
            points_cost: 600,
        },
    ];
    &CATALOG
}

/// Look up a catalog entry by id.
pub fn find_reward(id: &str) -> Option<&'static Reward> {
    reward_catalog().iter().find(|r| r.id == id)
}
