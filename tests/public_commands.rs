use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use meshfish::chat::{CommandProcessor, MAX_REPLY_BYTES};
use meshfish::config::CommandConfig;
use meshfish::fishing::{FishVariant, QualityTier};
use meshfish::storage::{ChannelSwitches, MemoryStore};

mod common;

fn processor_with(fish: FishVariant) -> (Arc<MemoryStore>, CommandProcessor) {
    let catalog = common::one_fish_catalog(QualityTier::Golden, fish, 300, 0.15);
    let (store, service) = common::memory_service(catalog);
    let commands = CommandConfig {
        prefix: "^".to_string(),
        admins: vec!["sysop".to_string()],
    };
    let processor = CommandProcessor::new(Arc::new(service), store.clone(), &commands);
    (store, processor)
}

#[test]
fn ordinary_chat_is_ignored() {
    let (_store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(p.handle("alice", Some("general"), "anyone fishing today?", &mut rng).is_none());
    assert!(p.handle("alice", Some("general"), "^WEATHER", &mut rng).is_none());
}

#[test]
fn cast_reply_has_reveal_delay_and_flavor() {
    let (_store, mut p) = processor_with(FishVariant::with_flavor(
        "Tycoon Tuna",
        "It hands you a business card.",
    ));
    let mut rng = StdRng::seed_from_u64(4);
    let reply = p.handle("alice", Some("general"), "^FISH", &mut rng).expect("reply");
    assert!(reply.text.contains("Golden Tycoon Tuna (300cm)"), "{}", reply.text);
    assert!(reply.text.contains("It hands you a business card."));
    assert!(reply.reveal_delay >= Duration::from_secs(1));
    assert!(reply.reveal_delay <= Duration::from_secs(6));
    assert!(reply.text.len() <= MAX_REPLY_BYTES);
}

#[test]
fn second_cast_inside_cooldown_is_refused() {
    let (_store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(5);
    p.handle("bob", None, "^CAST", &mut rng).expect("first");
    let reply = p.handle("bob", None, "^cast", &mut rng).expect("second");
    assert!(reply.text.starts_with("Your line is still wet"), "{}", reply.text);
    assert_eq!(reply.reveal_delay, Duration::ZERO);
    // Another user is not held up by bob's cooldown.
    let reply = p.handle("carol", None, "^FISH", &mut rng).expect("carol");
    assert!(reply.text.contains("Tycoon Tuna"));
}

#[test]
fn toggle_is_admin_only_and_blocks_casts() {
    let (store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(6);

    let reply = p.handle("alice", Some("general"), "^FISHTOGGLE", &mut rng).unwrap();
    assert_eq!(reply.text, "Only admins can toggle fishing.");
    assert!(store.channel_enabled("general").unwrap());

    let reply = p.handle("sysop", Some("General"), "^FISHTOGGLE", &mut rng).unwrap();
    assert_eq!(reply.text, "Fishing disabled here.");
    assert!(!store.channel_enabled("general").unwrap());

    let reply = p.handle("alice", Some("general"), "^FISH", &mut rng).unwrap();
    assert_eq!(reply.text, "Fishing is disabled in this channel.");
    // Direct conversations are unaffected.
    let reply = p.handle("alice", None, "^FISH", &mut rng).unwrap();
    assert!(reply.text.contains("Tycoon Tuna"));

    let reply = p.handle("sysop", Some("general"), "^FISHTOGGLE", &mut rng).unwrap();
    assert_eq!(reply.text, "Fishing enabled here.");
}

#[test]
fn bag_sell_and_stats_round_trip() {
    let (_store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(7);

    let reply = p.handle("dora", None, "^BAG", &mut rng).unwrap();
    assert_eq!(reply.text, "Your bag is empty.");

    p.handle("dora", None, "^FISH", &mut rng).unwrap();
    let reply = p.handle("dora", None, "^INV", &mut rng).unwrap();
    assert_eq!(reply.text, "Golden: Tycoon Tuna (300cm)");

    let reply = p.handle("dora", None, "^STATS", &mut rng).unwrap();
    assert!(reply.text.starts_with("Rod: Normal (next at 50) | Catches: 1"), "{}", reply.text);

    let reply = p.handle("dora", None, "^SELL Nessie", &mut rng).unwrap();
    assert_eq!(reply.text, "No 'Nessie' in your bag.");

    let reply = p.handle("dora", None, "^SELL golden", &mut rng).unwrap();
    assert_eq!(reply.text, "Sold 1 lot for 45.00 coins.");

    let reply = p.handle("dora", None, "^SELL all", &mut rng).unwrap();
    assert_eq!(reply.text, "Your bag is empty.");

    let reply = p.handle("dora", None, "^SELL", &mut rng).unwrap();
    assert_eq!(reply.text, "Usage: ^SELL <name|quality|all>");
}

#[test]
fn help_lists_every_command() {
    let (_store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(8);
    let reply = p.handle("erin", None, "^FISHHELP", &mut rng).unwrap();
    for cmd in ["^FISH", "^BAG", "^SELL", "^STATS", "^FISHTOGGLE"] {
        assert!(reply.text.contains(cmd), "missing {} in {}", cmd, reply.text);
    }
    assert!(reply.text.len() <= MAX_REPLY_BYTES);
}

#[test]
fn blank_user_gets_a_typed_refusal() {
    let (_store, mut p) = processor_with(FishVariant::plain("Tycoon Tuna"));
    let mut rng = StdRng::seed_from_u64(9);
    let reply = p.handle("   ", None, "^FISH", &mut rng).unwrap();
    assert_eq!(reply.text, "Who's fishing? No user id.");
}

#[test]
fn failed_cast_does_not_start_the_cooldown() {
    // A tier with no positive weight makes every draw fail.
    let catalog = common::one_fish_catalog(QualityTier::Common, FishVariant::plain("Ghost"), 10, 0.1);
    let mut configs: Vec<_> = catalog.tiers().cloned().collect();
    configs[0].weight = 0.0;
    let catalog = Arc::new(meshfish::fishing::Catalog::new(configs));
    let (store, service) = common::memory_service(catalog);
    let commands = CommandConfig {
        prefix: "^".to_string(),
        admins: Vec::new(),
    };
    let mut p = CommandProcessor::new(Arc::new(service), store, &commands);
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..2 {
        let reply = p.handle("dora", None, "^FISH", &mut rng).expect("reply");
        assert!(reply.text.starts_with("Something went wrong"), "{}", reply.text);
    }
}
