//! Built-in sample customer for `telecom-pitch demo`

use telecom_pitch_agent::PipelineRequest;
use telecom_pitch_core::{Allowance, NetworkPriority, Plan, UsageReport, UsageStatistics};

const CONVERSATION: &str = "Hi, I'm looking at my phone bill and it seems really high. I'm currently \
paying $85 per month and I feel like I'm not getting good value. I use my phone a lot for work - lots \
of video calls and I'm always streaming music during my commute. I travel internationally about twice \
a year for business and the roaming charges are killing me. My current plan only gives me 15GB of \
data and I'm constantly hitting the limit. I need unlimited data or at least way more than I have \
now. The coverage at my office downtown is also pretty spotty - calls drop frequently. I've been with \
my current carrier for 3 years but I'm ready to switch if I can get better value and reliability. \
I'd prefer not to be locked into a long contract if possible.";

fn current_plan() -> Plan {
    Plan::new(
        "current_basic_15gb",
        "Business Basic 15GB",
        85.0,
        Allowance::Limited(15.0),
        Allowance::Unlimited,
    )
    .hotspot(5.0)
    .features(["Visual Voicemail", "Mobile Hotspot"])
    .contract(24, 35.0)
}

fn target_plan() -> Plan {
    Plan::new(
        "premium_unlimited",
        "Premium Unlimited Pro",
        75.0,
        Allowance::Unlimited,
        Allowance::Unlimited,
    )
    .international(true)
    .roaming(true)
    .hotspot(50.0)
    .network(NetworkPriority::Premium)
    .features([
        "Premium Network Priority",
        "50GB Mobile Hotspot",
        "International Calling & Text",
        "Free Roaming in 200+ Countries",
        "Advanced Security Features",
        "24/7 Premium Support",
    ])
    .contract(12, 0.0)
    .promotion(20.0, 6)
}

fn usage() -> UsageReport {
    let stats = UsageStatistics::new(18.5, 850, 1200)
        .international(true)
        .roaming(true)
        .peak_hours([8, 9, 17, 18, 19]);

    UsageReport::new(stats)
        .customer("cust_12345", "Sarah Johnson")
        .location("Downtown Seattle")
        .current_spend(85.0)
        .business_user(true)
}

/// Business traveller on a capped plan, pitched an unlimited premium plan
pub fn sample_request() -> PipelineRequest {
    PipelineRequest::new(CONVERSATION, current_plan(), target_plan(), usage())
}
