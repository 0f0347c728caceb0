//! Built-in debate prompts.

/// Prompts used by `standard` mode and the standard half of `hybrid` mode.
pub const STANDARD_TOPICS: &[&str] = &[
    // Politics and society
    "Politicians should earn the minimum wage",
    "Voting should be mandatory, with fines for skipping it",
    "Billionaires should not exist",
    "Social media should be regulated like tobacco",
    "Military service should be compulsory for everyone",
    "A benevolent dictatorship beats a corrupt democracy",
    "Public transport should be free",
    "Fake news should be a criminal offence",
    // Technology
    "Artificial intelligence will replace most office jobs",
    "We should all get brain implants",
    "Robots deserve rights",
    "Smartphones should be banned for children under 14",
    "Video games are a legitimate art form",
    "Humans should colonise Mars before fixing Earth",
    // Ethics
    "The end justifies the means",
    "It is fine to lie to protect someone",
    "Loyalty matters more than honesty",
    "Forgiving is a sign of weakness",
    "Nobody is truly a good person",
    "Eating meat will be seen as barbaric in 50 years",
    // Everyday life
    "Weekends should last three days",
    "Naps should be mandatory at work",
    "Coffee is more important than sleep",
    "Dishes must be washed immediately after eating",
    "Working from home is better than the office",
    "Breakfast is the most overrated meal",
    // Pop culture
    "Marvel is better than DC",
    "Modern music is worse than music from the 90s",
    "Influencers are a net negative for society",
    "Book adaptations are always worse than the book",
    "Reality TV should be banned",
    "Football is the opium of the people",
    // Absurd
    "Pineapple on pizza is a crime",
    "Dogs should be allowed to vote",
    "Cats are secretly running the world",
    "Life is just a simulation",
    "Birds should be allowed to drive",
    "The colour blue is objectively better than red",
    // Spicy
    "Money does buy happiness",
    "Your ex was right about you",
    "Attractive people have easier lives",
    "Karma does not exist",
    "Everyone is a hypocrite",
    "Children did not ask to be born",
];
