//! Bill splitting
//!
//! Turns a bill (total, the user's own expense, who paid) into the signed
//! delta applied to the selected friend's balance.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Payer {
    #[default]
    User,
    Friend,
}

impl Payer {
    pub fn toggle(self) -> Self {
        match self {
            Payer::User => Payer::Friend,
            Payer::Friend => Payer::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillSplit {
    pub bill_value: f64,
    pub paid_by_user: f64,
    pub payer: Payer,
}

impl BillSplit {
    /// The part of the bill that is the friend's expense.
    pub fn friend_share(&self) -> f64 {
        self.bill_value - self.paid_by_user
    }

    /// If the user paid, the friend now owes their share. If the friend
    /// paid, the user owes their own expense.
    pub fn delta(&self) -> f64 {
        match self.payer {
            Payer::User => self.friend_share(),
            Payer::Friend => -self.paid_by_user,
        }
    }
}

/// Accept `candidate` as the user's expense unless it exceeds the bill, in
/// which case `previous` is kept. A missing bill counts as zero.
pub fn clamp_paid_by_user(candidate: f64, previous: f64, bill_value: Option<f64>) -> f64 {
    if candidate > bill_value.unwrap_or(0.0) {
        previous
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_pays_friend_owes_their_share() {
        let split = BillSplit {
            bill_value: 20.0,
            paid_by_user: 5.0,
            payer: Payer::User,
        };
        assert_eq!(split.friend_share(), 15.0);
        assert_eq!(split.delta(), 15.0);
        // Clark starts at -7
        assert_eq!(-7.0 + split.delta(), 8.0);
    }

    #[test]
    fn friend_pays_user_owes_own_expense() {
        let split = BillSplit {
            bill_value: 20.0,
            paid_by_user: 5.0,
            payer: Payer::Friend,
        };
        assert_eq!(split.delta(), -5.0);
        assert_eq!(-7.0 + split.delta(), -12.0);
    }

    #[test]
    fn user_covering_whole_bill_leaves_nothing_for_friend() {
        let split = BillSplit {
            bill_value: 42.0,
            paid_by_user: 42.0,
            payer: Payer::User,
        };
        assert_eq!(split.delta(), 0.0);
    }

    #[test]
    fn negative_bill_is_not_rejected() {
        let split = BillSplit {
            bill_value: -10.0,
            paid_by_user: -20.0,
            payer: Payer::User,
        };
        assert_eq!(split.delta(), 10.0);
    }

    #[test]
    fn clamp_keeps_previous_when_over_bill() {
        assert_eq!(clamp_paid_by_user(25.0, 5.0, Some(20.0)), 5.0);
        assert_eq!(clamp_paid_by_user(20.0, 5.0, Some(20.0)), 20.0);
        assert_eq!(clamp_paid_by_user(3.0, 5.0, Some(20.0)), 3.0);
    }

    #[test]
    fn clamp_treats_missing_bill_as_zero() {
        assert_eq!(clamp_paid_by_user(1.0, 0.0, None), 0.0);
        assert_eq!(clamp_paid_by_user(0.0, 0.0, None), 0.0);
    }

    #[test]
    fn payer_toggles() {
        assert_eq!(Payer::default(), Payer::User);
        assert_eq!(Payer::User.toggle(), Payer::Friend);
        assert_eq!(Payer::Friend.toggle(), Payer::User);
    }
}
