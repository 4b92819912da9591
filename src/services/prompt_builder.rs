//! Builds the trip-planning prompt sent to the language model.
//!
//! All domain rules live in the prompt text, not in code: attraction counts
//! and radii, the overnight-stops-only routing rule, round-trip route
//! separation, and the exact JSON shape the generation client parses. The
//! model's compliance is checked only at the parse boundary.

use crate::models::trip::PlanTripRequest;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a professional trip planner. Always respond with valid JSON matching the exact format requested.";

const ATTRACTIONS_PER_DAY: u32 = 5;
const ATTRACTION_RADIUS_MILES: u32 = 100;
const MAX_TOTAL_STOPS: u32 = 25;
const ROUTE_SEPARATION_MILES: u32 = 100;
const DEFAULT_DAY_START: &str = "9:00 AM";

/// Render the user prompt for one trip request.
pub fn build_prompt(request: &PlanTripRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a professional trip planner specializing in road trips.\n\n");
    prompt.push_str(
        "Using the trip details provided, create a realistic, day-by-day driving itinerary.\n",
    );
    prompt.push_str(&format!(
        "Include cities or towns for overnight stays and exactly {} attractions within {} miles of each overnight city.\n\n",
        ATTRACTIONS_PER_DAY, ATTRACTION_RADIUS_MILES
    ));
    prompt.push_str(
        "IMPORTANT: The driving route should ONLY connect overnight stops - do not include attractions as waypoints in the driving directions.\n\n",
    );

    prompt.push_str("Trip Details:\n");
    prompt.push_str(&format!("- Start: {}\n", request.start_location));
    prompt.push_str(&format!("- End: {}\n", request.end_location));
    prompt.push_str(&format!(
        "- Start Date: {} at {}\n",
        request.start_date, request.start_time
    ));
    prompt.push_str(&format!("- End Date: {}\n", request.end_date));
    prompt.push_str(&format!(
        "- Latest check-in time: {}\n",
        request.check_in_time
    ));
    prompt.push_str(&format!(
        "- Trip Type: {}\n",
        if request.is_round_trip {
            "Round Trip (return to starting location)"
        } else {
            "One Way"
        }
    ));

    if request.is_round_trip {
        prompt.push_str(&round_trip_requirements(request));
    }

    if let Some(interests) = interests_of(request) {
        prompt.push_str(&interest_requirements(&interests));
    }

    prompt.push_str(&rules_section(request.is_round_trip));
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

fn interests_of(request: &PlanTripRequest) -> Option<Vec<String>> {
    request
        .interests
        .as_ref()
        .filter(|interests| !interests.is_empty())
        .cloned()
}

fn round_trip_requirements(request: &PlanTripRequest) -> String {
    format!(
        "\nCRITICAL ROUND TRIP REQUIREMENTS - NO EXCEPTIONS:\n\
This is a ROUND TRIP that MUST form a true loop with minimal overlap. Follow these MANDATORY requirements:\n\n\
1. OUTBOUND ROUTE ({start} -> {end}):\n\
   - Plan one specific route with 2-3 overnight stops\n\
   - Use specific highways, cities, and geographic regions\n\n\
2. RETURN ROUTE ({end} -> {start}):\n\
   - MUST use a completely different path that avoids ALL outbound cities\n\
   - Choose overnight stops that are {separation}+ miles away from ANY outbound overnight city\n\
   - Use different highways, mountain passes, coastal routes, or interstate systems\n\
   - Create geographic separation (if outbound is I-5, return could be I-101 coastal or inland I-99)\n\n\
SPECIFIC ROUTE SEPARATION STRATEGIES:\n\
- California trips: If outbound uses I-5 (Central Valley), return should use Highway 1 (Coast) or I-395 (Eastern Sierra)\n\
- Cross-country: If outbound uses northern states, return through southern states\n\
- Regional: If outbound goes through mountains, return through valleys or coastal plains\n\
- NEVER reuse the same overnight cities on both legs\n\
- Maintain {separation}+ mile separation between outbound and return overnight stops\n\n\
The result should look like a large loop on the map, not a back-and-forth on the same roads.\n",
        start = request.start_location,
        end = request.end_location,
        separation = ROUTE_SEPARATION_MILES,
    )
}

fn interest_requirements(interests: &[String]) -> String {
    let mut section = format!("\n- Travel Interests: {}\n\n", interests.join(", "));
    section.push_str("CRITICAL REQUIREMENTS:\n");
    section.push_str(
        "1. The itinerary MUST include attractions from EVERY selected interest category. No exceptions.\n",
    );
    section.push_str(&format!(
        "2. Recommend exactly {} attractions per day that are within {} miles of the overnight stop for that day.\n",
        ATTRACTIONS_PER_DAY, ATTRACTION_RADIUS_MILES
    ));
    section.push_str(
        "3. Only include driving routes between overnight stops - do NOT route through attractions in the initial route.\n",
    );
    section.push_str(
        "4. If an interest category has too few high-quality matches near the route, fill the remaining slots with well-known, highly rated general attractions - but every selected interest must still appear at least once.\n\n",
    );

    section.push_str("For each interest category selected:\n");
    for interest in interests {
        section.push_str(&format!(
            "- {}: MUST include specific attractions of this type within {} miles of overnight stops\n",
            interest, ATTRACTION_RADIUS_MILES
        ));
    }

    section.push_str(
        "\nExamples of what to include:\n\
- For \"Beaches and coast\": Include beaches, coastal viewpoints, seaside towns, coastal state parks, lighthouses, or oceanfront attractions\n\
- For \"Waterfalls\": Include named waterfalls, waterfall hikes, or cascade viewpoints\n\
- For \"Mountains\": Include mountain peaks, scenic overlooks, mountain parks, or alpine areas\n\
- For \"National and State Parks\": Include specific national or state parks along the route\n\n\
Distribute these interest-based attractions across different days. Each selected interest category MUST appear in the final itinerary.\n",
    );
    section
}

fn rules_section(is_round_trip: bool) -> String {
    let mut rules = String::from("\nRules:\n");
    rules.push_str("- Assume travel is by car\n");
    rules.push_str("- Day 1 starts at the provided start date/time\n");
    rules.push_str(&format!(
        "- All subsequent days start at {} local time\n",
        DEFAULT_DAY_START
    ));
    rules.push_str(&format!(
        "- Keep the total number of stops (including start, overnights, destination, and attractions) at or below {}\n",
        MAX_TOTAL_STOPS
    ));
    rules.push_str("- Ensure realistic driving times and distances between overnight stops only\n");
    rules.push_str("- Include estimated driving times between overnight cities\n");
    rules.push_str(&format!(
        "- Include exactly {} attractions per day that are within {} miles of the overnight stop\n",
        ATTRACTIONS_PER_DAY, ATTRACTION_RADIUS_MILES
    ));
    rules.push_str(
        "- The initial route should ONLY connect overnight stops - do not include attractions in the driving route\n",
    );
    rules.push_str("- Include attractions that match the traveler's specified interests\n");
    if is_round_trip {
        rules.push_str(
            "- ROUND TRIP MANDATORY RULES:\n\
  * ZERO OVERLAP TOLERANCE: Return route cannot share the same highways or cities as outbound\n\
  * GEOGRAPHIC SEPARATION: Maintain minimum 100-mile distance between outbound and return overnight cities\n\
  * DIFFERENT ROUTE SYSTEMS: Use completely different interstate systems, highways, or geographic corridors\n\
  * LOOP FORMATION: The final route should form a visible loop on the map, not a linear back-and-forth\n\
  * DISTINCT EXPERIENCES: Each leg should offer unique landscapes, cities, and attractions\n",
        );
    }
    rules
}

const RESPONSE_FORMAT: &str = r#"

Return the plan in STRICT JSON format with this exact structure:
{
  "totalDays": number,
  "totalDistance": number (in miles),
  "totalDrivingTime": "string (e.g., '16h 35m')",
  "totalAttractions": number,
  "days": [
    {
      "dayNumber": number,
      "date": "YYYY-MM-DD",
      "route": {
        "from": "string",
        "to": "string",
        "distance": number (in miles),
        "drivingTime": "string (e.g., '2h 15m')",
        "departureTime": "string (e.g., '9:00 AM')",
        "arrivalTime": "string (e.g., '11:15 AM')"
      },
      "attractions": [
        {
          "name": "string",
          "description": "string (within 100 miles of overnight stop)",
          "estimatedDuration": "string (e.g., '2h')",
          "category": "string (from user interests)"
        }
      ],
      "overnightLocation": "string"
    }
  ]
}"#;
