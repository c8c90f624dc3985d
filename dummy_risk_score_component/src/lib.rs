//! # Dummy Risk Score Source Blueprint
//! Component standing in for the position manager, so tests can control risk scores
//! independently of the list.

use scrypto::prelude::*;

#[blueprint]
mod risk_score_source {
    enable_method_auth! {
        methods {
            get_risk_score => PUBLIC;
            get_lookup_count => PUBLIC;
            set_risk_score => restrict_to: [OWNER];
            set_risk_scores => restrict_to: [OWNER];
            set_infinitely_safe => restrict_to: [OWNER];
            remove_risk_score => restrict_to: [OWNER];
            reset_lookup_count => restrict_to: [OWNER];
        }
    }

    struct RiskScoreSource {
        risk_scores: HashMap<NonFungibleLocalId, Decimal>,
        /// Number of `get_risk_score` calls since the last reset.
        lookups: u64,
    }

    impl RiskScoreSource {
        pub fn instantiate_risk_score_source(owner_role: OwnerRole) -> Global<RiskScoreSource> {
            Self {
                risk_scores: HashMap::new(),
                lookups: 0,
            }
            .instantiate()
            .prepare_to_globalize(owner_role)
            .metadata(metadata! {
                init {
                    "name" => "Dummy Risk Score Source".to_string(), updatable;
                    "description" => "A dummy risk score source used for testing the position registry".to_string(), updatable;
                    "info_url" => Url::of("https://flux.ilikeitstable.com"), updatable;
                }
            })
            .globalize()
        }

        pub fn get_risk_score(&mut self, id: NonFungibleLocalId) -> Decimal {
            self.lookups += 1;

            self.risk_scores
                .get(&id)
                .cloned()
                .expect("Risk score not set for this position")
        }

        pub fn get_lookup_count(&self) -> u64 {
            self.lookups
        }

        pub fn set_risk_score(&mut self, id: NonFungibleLocalId, risk_score: Decimal) {
            self.risk_scores.insert(id, risk_score);
        }

        pub fn set_risk_scores(&mut self, risk_scores: Vec<(NonFungibleLocalId, Decimal)>) {
            for (id, risk_score) in risk_scores {
                self.risk_scores.insert(id, risk_score);
            }
        }

        /// A position without debt.
        pub fn set_infinitely_safe(&mut self, id: NonFungibleLocalId) {
            self.risk_scores.insert(id, Decimal::MAX);
        }

        /// Makes later lookups of `id` fail, as a source would for an unknown position.
        pub fn remove_risk_score(&mut self, id: NonFungibleLocalId) {
            self.risk_scores.remove(&id);
        }

        pub fn reset_lookup_count(&mut self) {
            self.lookups = 0;
        }
    }
}
