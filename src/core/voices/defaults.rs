/// Built-in voices used when no valid catalog file exists
pub const DEFAULT_VOICES: &[(&str, &str)] = &[
    ("charon", "Charon - Male voice"),
    ("kore", "Kore - Female voice"),
    ("angus", "Angus - Male voice"),
    ("brian", "Brian - Male voice"),
    ("davis", "Davis - Male voice"),
    ("emil", "Emil - Male voice"),
    ("ethan", "Ethan - Male voice"),
    ("greg", "Greg - Male voice"),
    ("jeremy", "Jeremy - Male voice"),
    ("joel", "Joel - Male voice"),
    ("larry", "Larry - Male voice"),
    ("paul", "Paul - Male voice"),
    ("tim", "Tim - Male voice"),
    ("will", "Will - Male voice"),
    ("seraphina", "Seraphina - Female voice"),
    ("amber", "Amber - Female voice"),
    ("emma", "Emma - Female voice"),
    ("grace", "Grace - Female voice"),
    ("ivy", "Ivy - Female voice"),
    ("jessica", "Jessica - Female voice"),
    ("karen", "Karen - Female voice"),
    ("linda", "Linda - Female voice"),
    ("olivia", "Olivia - Female voice"),
    ("sarah", "Sarah - Female voice"),
    ("violet", "Violet - Female voice"),
    ("zoe", "Zoe - Female voice"),
    ("alex", "Alex - Neutral voice"),
    ("eric", "Eric - Male voice"),
    ("jason", "Jason - Male voice"),
    ("justin", "Justin - Male voice"),
];
